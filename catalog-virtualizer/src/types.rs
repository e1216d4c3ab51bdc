/// How a group's records are packed into virtual items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupMode {
    /// One record per item.
    #[default]
    List,
    /// Records packed left-to-right into rows of `columns` records.
    Grid,
}

/// The currently visible scroll window.
///
/// `container_width`/`container_height` are `0` until the container has been measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub scroll_top: u64,
    pub container_height: u32,
    pub container_width: u32,
}

impl Viewport {
    pub fn new(scroll_top: u64, container_height: u32, container_width: u32) -> Self {
        Self {
            scroll_top,
            container_height,
            container_width,
        }
    }

    pub fn scroll_bottom(&self) -> u64 {
        self.scroll_top.saturating_add(self.container_height as u64)
    }

    pub fn is_measured(&self) -> bool {
        self.container_height > 0 && self.container_width > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// The typed payload of a [`VirtualItem`].
///
/// Section and record positions index into the owning group (`VirtualItem::group`), so an item
/// stays `Copy` and never borrows the catalog. Use [`VirtualItem::resolve`] to get labels and
/// records back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// The group's header label.
    Header,
    /// A section divider (e.g. "Disc 2"); only emitted when a group has several sections.
    SectionHeader { section: usize },
    /// A grid row holding `len` records starting at `start`.
    Row {
        section: Option<usize>,
        start: usize,
        len: usize,
    },
    /// A single list record at `position` in its group/section.
    ///
    /// `ordinal` counts records across the whole layout.
    Record {
        section: Option<usize>,
        position: usize,
        ordinal: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    /// Position in the flattened layout.
    pub index: usize,
    /// Cumulative offset from the top of the content.
    pub top: u64,
    pub height: u32,
    /// Position of the owning group in the input.
    pub group: usize,
    pub kind: ItemKind,
}

impl VirtualItem {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }

    pub fn is_header(&self) -> bool {
        matches!(self.kind, ItemKind::Header)
    }

    /// Returns `true` if `[top, bottom)` intersects `[start, end)`.
    pub fn intersects(&self, start: u64, end: u64) -> bool {
        self.top < end && self.bottom() > start
    }
}

/// A [`VirtualItem`] resolved against the groups it was flattened from.
#[derive(Debug)]
pub enum ItemView<'a, K, R> {
    Header { id: &'a K, label: &'a str },
    SectionHeader { label: &'a str },
    Row { records: &'a [R] },
    Record { record: &'a R, index: usize },
}

impl<K, R> Clone for ItemView<'_, K, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, R> Copy for ItemView<'_, K, R> {}
