use alloc::sync::Arc;

use crate::virtualizer::CatalogVirtualizer;
use crate::{GroupMode, Viewport};

/// A callback fired when the virtualizer's viewport or layout changes.
pub type OnChangeCallback<K, R> = Arc<dyn Fn(&CatalogVirtualizer<K, R>) + Send + Sync>;

/// The inputs of a flatten pass besides the groups themselves.
///
/// Heights are in pixels. A height of `0` is treated as `1` and `columns < 1` as `1`, so a
/// flattened layout never contains zero-height items or zero-width rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlattenOptions {
    pub show_group_headers: bool,
    pub mode: GroupMode,
    pub columns: usize,
    pub row_height: u32,
    pub header_height: u32,
    pub section_header_height: u32,
}

impl FlattenOptions {
    pub fn list(row_height: u32) -> Self {
        Self {
            show_group_headers: true,
            mode: GroupMode::List,
            columns: 1,
            row_height,
            header_height: row_height,
            section_header_height: row_height,
        }
    }

    pub fn grid(columns: usize, row_height: u32) -> Self {
        Self {
            mode: GroupMode::Grid,
            columns,
            ..Self::list(row_height)
        }
    }

    pub fn with_group_headers(mut self, show: bool) -> Self {
        self.show_group_headers = show;
        self
    }

    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.header_height = header_height;
        self
    }

    pub fn with_section_header_height(mut self, section_header_height: u32) -> Self {
        self.section_header_height = section_header_height;
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Columns actually used for packing: always `1` in list mode, never below `1` in grid mode.
    pub fn effective_columns(&self) -> usize {
        match self.mode {
            GroupMode::List => 1,
            GroupMode::Grid => self.columns.max(1),
        }
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::list(56).with_header_height(40)
    }
}

/// Fixed cell geometry used to plan grid columns from the container width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    pub item_width: u32,
    pub gap: u32,
}

impl GridOptions {
    pub fn new(item_width: u32, gap: u32) -> Self {
        Self { item_width, gap }
    }
}

/// Configuration for [`crate::CatalogVirtualizer`].
///
/// Cheap to clone: the callback is stored in an `Arc`.
pub struct VirtualizerOptions<K, R> {
    /// Layout inputs. In grid mode `flatten.columns` is replaced by the planned column count
    /// whenever `grid` is set.
    pub flatten: FlattenOptions,
    /// When set (grid mode), columns are planned from the container width.
    pub grid: Option<GridOptions>,
    /// Extra items rendered on each side of the strict viewport.
    pub buffer: usize,
    pub initial_viewport: Viewport,
    pub on_change: Option<OnChangeCallback<K, R>>,
}

impl<K, R> Clone for VirtualizerOptions<K, R> {
    fn clone(&self) -> Self {
        Self {
            flatten: self.flatten,
            grid: self.grid,
            buffer: self.buffer,
            initial_viewport: self.initial_viewport,
            on_change: self.on_change.clone(),
        }
    }
}

impl<K, R> VirtualizerOptions<K, R> {
    pub fn new(flatten: FlattenOptions) -> Self {
        Self {
            flatten,
            grid: None,
            buffer: 5,
            initial_viewport: Viewport::default(),
            on_change: None,
        }
    }

    /// Grid mode with columns planned from `grid` and the container width.
    pub fn grid(row_height: u32, grid: GridOptions) -> Self {
        Self {
            grid: Some(grid),
            ..Self::new(FlattenOptions::grid(1, row_height))
        }
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_group_headers(mut self, show: bool) -> Self {
        self.flatten.show_group_headers = show;
        self
    }

    pub fn with_header_height(mut self, header_height: u32) -> Self {
        self.flatten.header_height = header_height;
        self
    }

    pub fn with_section_header_height(mut self, section_header_height: u32) -> Self {
        self.flatten.section_header_height = section_header_height;
        self
    }

    pub fn with_initial_viewport(mut self, viewport: Viewport) -> Self {
        self.initial_viewport = viewport;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&CatalogVirtualizer<K, R>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K, R> core::fmt::Debug for VirtualizerOptions<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("flatten", &self.flatten)
            .field("grid", &self.grid)
            .field("buffer", &self.buffer)
            .field("initial_viewport", &self.initial_viewport)
            .finish_non_exhaustive()
    }
}
