use alloc::vec::Vec;

use crate::key::{GroupKey, GroupOffsetMap};
use crate::{
    FlattenOptions, Group, GroupBody, GroupMode, ItemKind, ItemView, Viewport, VirtualItem,
    VisibleRange,
};

/// The flattened, offset-annotated item sequence of a catalog.
///
/// A layout is a pure function of `(groups, options)`: it is never mutated after [`flatten`]
/// returns, only replaced, so it can be shared freely (e.g. behind an `Arc`) between the range
/// query and scroll-to-group lookups.
#[derive(Clone, Debug)]
pub struct FlattenedLayout<K> {
    items: Vec<VirtualItem>,
    total_height: u64,
    record_count: usize,
    columns: usize,
    group_offsets: GroupOffsetMap<K>,
    // Per input group: index of its first item, `None` for groups that emitted nothing.
    group_first_item: Vec<Option<usize>>,
}

impl<K: GroupKey> PartialEq for FlattenedLayout<K> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.total_height == other.total_height
            && self.record_count == other.record_count
            && self.columns == other.columns
            && self.group_offsets == other.group_offsets
            && self.group_first_item == other.group_first_item
    }
}

impl<K: GroupKey> Default for FlattenedLayout<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_height: 0,
            record_count: 0,
            columns: 1,
            group_offsets: GroupOffsetMap::<K>::new(),
            group_first_item: Vec::new(),
        }
    }
}

/// Flattens `groups` into positioned virtual items.
///
/// Groups are walked in order. A group without records emits nothing, not even its header. A
/// non-empty header label is emitted when `show_group_headers` is set. Sectioned groups emit a
/// section header before each non-empty section only when there is more than one of them.
/// Records are packed one per item (list) or `columns` per row (grid).
pub fn flatten<K: GroupKey, R>(
    groups: &[Group<K, R>],
    options: &FlattenOptions,
) -> FlattenedLayout<K> {
    let mut builder = Builder::new(options, groups.len());

    for (gi, group) in groups.iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        builder.begin_group(gi, &group.id);

        if options.show_group_headers && group.header_label().is_some() {
            builder.push(gi, options.header_height, ItemKind::Header);
        }

        match &group.body {
            GroupBody::Records(records) => builder.pack(gi, None, records.len()),
            GroupBody::Sections(sections) => {
                let non_empty = sections.iter().filter(|s| !s.records.is_empty()).count();
                for (si, section) in sections.iter().enumerate() {
                    if section.records.is_empty() {
                        continue;
                    }
                    if non_empty > 1 {
                        builder.push(
                            gi,
                            options.section_header_height,
                            ItemKind::SectionHeader { section: si },
                        );
                    }
                    builder.pack(gi, Some(si), section.records.len());
                }
            }
        }
    }

    let layout = builder.finish();
    vdebug!(
        groups = groups.len(),
        items = layout.items.len(),
        records = layout.record_count,
        columns = layout.columns,
        total_height = layout.total_height,
        "flatten"
    );
    layout
}

struct Builder<'o, K> {
    options: &'o FlattenOptions,
    columns: usize,
    offset: u64,
    ordinal: usize,
    items: Vec<VirtualItem>,
    group_offsets: GroupOffsetMap<K>,
    group_first_item: Vec<Option<usize>>,
}

impl<'o, K: GroupKey> Builder<'o, K> {
    fn new(options: &'o FlattenOptions, group_count: usize) -> Self {
        Self {
            options,
            columns: options.effective_columns(),
            offset: 0,
            ordinal: 0,
            items: Vec::new(),
            group_offsets: GroupOffsetMap::<K>::new(),
            group_first_item: alloc::vec![None; group_count],
        }
    }

    fn begin_group(&mut self, group: usize, id: &K) {
        self.group_first_item[group] = Some(self.items.len());
        if self.group_offsets.contains_key(id) {
            vwarn!(group, "flatten: duplicate group id, keeping the first occurrence");
            return;
        }
        self.group_offsets.insert(id.clone(), (group, self.offset));
    }

    fn push(&mut self, group: usize, height: u32, kind: ItemKind) {
        let height = height.max(1);
        self.items.push(VirtualItem {
            index: self.items.len(),
            top: self.offset,
            height,
            group,
            kind,
        });
        self.offset = self.offset.saturating_add(height as u64);
    }

    fn pack(&mut self, group: usize, section: Option<usize>, len: usize) {
        let row_height = self.options.row_height;
        match self.options.mode {
            GroupMode::List => {
                for position in 0..len {
                    let ordinal = self.ordinal;
                    self.push(
                        group,
                        row_height,
                        ItemKind::Record {
                            section,
                            position,
                            ordinal,
                        },
                    );
                    self.ordinal += 1;
                }
            }
            GroupMode::Grid => {
                for start in (0..len).step_by(self.columns) {
                    let n = self.columns.min(len - start);
                    self.push(
                        group,
                        row_height,
                        ItemKind::Row {
                            section,
                            start,
                            len: n,
                        },
                    );
                    self.ordinal += n;
                }
            }
        }
    }

    fn finish(self) -> FlattenedLayout<K> {
        FlattenedLayout {
            items: self.items,
            total_height: self.offset,
            record_count: self.ordinal,
            columns: self.columns,
            group_offsets: self.group_offsets,
            group_first_item: self.group_first_item,
        }
    }
}

impl<K: GroupKey> FlattenedLayout<K> {
    pub fn items(&self) -> &[VirtualItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VirtualItem> {
        self.items.get(index)
    }

    /// Height of the spacer that hosts the positioned items.
    pub fn total_height(&self) -> u64 {
        self.total_height
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Columns the records were packed into (always `1` in list mode).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Top offset of the group's first item (its header, or its first row when headers are
    /// hidden). `None` when the group is unknown or emitted no items.
    pub fn group_offset(&self, id: &K) -> Option<u64> {
        self.group_offsets.get(id).map(|&(_, top)| top)
    }

    /// Position of the group in the input it was flattened from.
    pub fn group_position(&self, id: &K) -> Option<usize> {
        self.group_offsets.get(id).map(|&(group, _)| group)
    }

    pub fn max_scroll_top(&self, container_height: u32) -> u64 {
        self.total_height.saturating_sub(container_height as u64)
    }

    /// Index range of the items intersecting the viewport, widened by `buffer` items on each
    /// side.
    ///
    /// Both ends are found by binary search over the item offsets, the second one only within
    /// the items after the first visible one. An empty layout, an unmeasured viewport
    /// (`container_height == 0`), or a scroll offset past the end yields an empty range.
    pub fn visible_range(&self, viewport: Viewport, buffer: usize) -> VisibleRange {
        let len = self.items.len();
        if len == 0 || viewport.container_height == 0 {
            return VisibleRange::EMPTY;
        }

        let scroll_top = viewport.scroll_top;
        let scroll_bottom = viewport.scroll_bottom();

        let first = self.items.partition_point(|it| it.bottom() <= scroll_top);
        if first >= len {
            return VisibleRange::EMPTY;
        }
        let visible = self.items[first..].partition_point(|it| it.top < scroll_bottom);
        if visible == 0 {
            return VisibleRange::EMPTY;
        }
        let last = first + visible - 1;

        VisibleRange {
            start: first.saturating_sub(buffer),
            end: last.saturating_add(buffer).saturating_add(1).min(len),
        }
    }

    /// The items of [`Self::visible_range`].
    pub fn visible_items(&self, viewport: Viewport, buffer: usize) -> &[VirtualItem] {
        let range = self.visible_range(viewport, buffer);
        &self.items[range.start..range.end]
    }

    /// The item covering `offset`, if any.
    pub fn item_at_offset(&self, offset: u64) -> Option<&VirtualItem> {
        let i = self.items.partition_point(|it| it.bottom() <= offset);
        self.items.get(i)
    }

    /// Position (in the input) of the group covering `offset`.
    ///
    /// Useful to highlight the current letter of a jump bar.
    pub fn group_index_at(&self, offset: u64) -> Option<usize> {
        self.item_at_offset(offset).map(|it| it.group)
    }

    /// All items emitted for the group at input position `group` (empty if none).
    pub fn group_items(&self, group: usize) -> &[VirtualItem] {
        let Some(&Some(first)) = self.group_first_item.get(group) else {
            return &[];
        };
        let tail = &self.items[first..];
        let len = tail.partition_point(|it| it.group == group);
        &tail[..len]
    }

    /// The header item of the group at input position `group`, if it emitted one.
    pub fn header_for_group(&self, group: usize) -> Option<&VirtualItem> {
        let first = (*self.group_first_item.get(group)?)?;
        self.items.get(first).filter(|it| it.is_header())
    }
}

/// Free-function form of [`FlattenedLayout::visible_range`].
pub fn visible_range<K: GroupKey>(
    layout: &FlattenedLayout<K>,
    viewport: Viewport,
    buffer: usize,
) -> VisibleRange {
    layout.visible_range(viewport, buffer)
}

impl VirtualItem {
    /// Resolves labels and records against the groups this item was flattened from.
    ///
    /// Returns `None` if `groups` is not the input of the layout that produced this item.
    pub fn resolve<'a, K, R>(&self, groups: &'a [Group<K, R>]) -> Option<ItemView<'a, K, R>> {
        let group = groups.get(self.group)?;
        match self.kind {
            ItemKind::Header => Some(ItemView::Header {
                id: &group.id,
                label: group.header.as_deref()?,
            }),
            ItemKind::SectionHeader { section } => Some(ItemView::SectionHeader {
                label: &group.section(section)?.label,
            }),
            ItemKind::Row {
                section,
                start,
                len,
            } => {
                let records = group.records_in(section);
                let end = start.checked_add(len)?;
                Some(ItemView::Row {
                    records: records.get(start..end)?,
                })
            }
            ItemKind::Record {
                section,
                position,
                ordinal,
            } => Some(ItemView::Record {
                record: group.records_in(section).get(position)?,
                index: ordinal,
            }),
        }
    }
}
