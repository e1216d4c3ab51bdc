use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::key::GroupKey;
use crate::layout::{FlattenedLayout, flatten};
use crate::{
    FlattenOptions, Group, GroupMode, ItemRenderer, Viewport, VirtualItem, VirtualizerOptions,
    VisibleRange, compute_columns,
};

/// A headless virtualized list/grid over grouped catalog records.
///
/// It owns the current groups, the viewport and the flattened layout derived from them. Any
/// change to the groups, the flatten options or the planned column count rebuilds the layout
/// synchronously inside the setter, so every read sees a layout that matches the current
/// inputs. Setters that do not change those inputs never rebuild.
///
/// Your adapter drives it by reporting container size and scroll offset, and renders the
/// visible items through [`Self::for_each_visible`].
#[derive(Clone)]
pub struct CatalogVirtualizer<K, R> {
    options: VirtualizerOptions<K, R>,
    groups: Arc<[Group<K, R>]>,
    viewport: Viewport,
    columns: usize,
    layout: Arc<FlattenedLayout<K>>,
    generation: u64,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K: GroupKey, R> CatalogVirtualizer<K, R> {
    pub fn new(options: VirtualizerOptions<K, R>) -> Self {
        Self::with_groups(options, Vec::<Group<K, R>>::new())
    }

    pub fn with_groups(
        options: VirtualizerOptions<K, R>,
        groups: impl Into<Arc<[Group<K, R>]>>,
    ) -> Self {
        let viewport = options.initial_viewport;
        let mut v = Self {
            options,
            groups: groups.into(),
            viewport,
            columns: 1,
            layout: Arc::new(FlattenedLayout::default()),
            generation: 0,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        v.columns = v.planned_columns();
        v.relayout();
        v
    }

    pub fn options(&self) -> &VirtualizerOptions<K, R> {
        &self.options
    }

    /// Replaces the options, rebuilding the layout only if layout inputs changed.
    pub fn set_options(&mut self, options: VirtualizerOptions<K, R>) {
        let prev_flatten = self.options.flatten;
        let prev_grid = self.options.grid;
        self.options = options;
        vtrace!(buffer = self.options.buffer, "CatalogVirtualizer::set_options");

        let columns = self.planned_columns();
        if self.options.flatten != prev_flatten
            || self.options.grid != prev_grid
            || columns != self.columns
        {
            self.columns = columns;
            self.relayout();
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualizerOptions<K, R>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_flatten_options(&mut self, flatten: FlattenOptions) {
        self.update_options(|o| o.flatten = flatten);
    }

    pub fn set_buffer(&mut self, buffer: usize) {
        self.options.buffer = buffer;
        self.notify();
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&CatalogVirtualizer<K, R>) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// Layout rebuilds are not deferred: each setter inside the batch still rebuilds
    /// synchronously, only the callback is coalesced.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn groups(&self) -> &Arc<[Group<K, R>]> {
        &self.groups
    }

    /// Replaces the groups wholesale and rebuilds the layout.
    ///
    /// Passing the same `Arc` again is a no-op.
    pub fn set_groups(&mut self, groups: impl Into<Arc<[Group<K, R>]>>) {
        let groups = groups.into();
        if Arc::ptr_eq(&self.groups, &groups) {
            return;
        }
        self.groups = groups;
        self.relayout();
        self.notify();
    }

    pub fn layout(&self) -> &Arc<FlattenedLayout<K>> {
        &self.layout
    }

    /// Incremented every time the layout is rebuilt.
    pub fn layout_generation(&self) -> u64 {
        self.generation
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn total_height(&self) -> u64 {
        self.layout.total_height()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.batch_update(|v| {
            v.set_container_size(viewport.container_width, viewport.container_height);
            v.set_scroll_top(viewport.scroll_top);
        });
    }

    /// Applies a container resize.
    ///
    /// In grid mode a width change re-plans the column count, and a changed column count
    /// rebuilds the layout before this returns.
    pub fn set_container_size(&mut self, width: u32, height: u32) {
        if self.viewport.container_width == width && self.viewport.container_height == height {
            return;
        }
        vtrace!(width, height, "set_container_size");
        let width_changed = self.viewport.container_width != width;
        self.viewport.container_width = width;
        self.viewport.container_height = height;

        if width_changed {
            let columns = self.planned_columns();
            if columns != self.columns {
                vdebug!(from = self.columns, to = columns, "column count changed");
                self.columns = columns;
                self.relayout();
            }
        }
        self.notify();
    }

    pub fn scroll_top(&self) -> u64 {
        self.viewport.scroll_top
    }

    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        if self.viewport.scroll_top == scroll_top {
            return;
        }
        vtrace!(scroll_top, "set_scroll_top");
        self.viewport.scroll_top = scroll_top;
        self.notify();
    }

    pub fn set_scroll_top_clamped(&mut self, scroll_top: u64) {
        let clamped = self.clamp_scroll_top(scroll_top);
        self.set_scroll_top(clamped);
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.layout.max_scroll_top(self.viewport.container_height)
    }

    pub fn clamp_scroll_top(&self, scroll_top: u64) -> u64 {
        scroll_top.min(self.max_scroll_top())
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.layout.visible_range(self.viewport, self.options.buffer)
    }

    pub fn visible_range_for(&self, viewport: Viewport) -> VisibleRange {
        self.layout.visible_range(viewport, self.options.buffer)
    }

    pub fn for_each_visible_item(&self, mut f: impl FnMut(VirtualItem)) {
        for item in self.layout.visible_items(self.viewport, self.options.buffer) {
            f(*item);
        }
    }

    /// Collects the buffered visible items into `out` (clears `out` first).
    pub fn collect_visible_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_visible_item(|it| out.push(it));
    }

    /// Hands every item of the buffered visible range to `renderer`, in layout order.
    pub fn for_each_visible(&self, renderer: &mut impl ItemRenderer<K, R>) {
        for item in self.layout.visible_items(self.viewport, self.options.buffer) {
            match item.resolve(&self.groups) {
                Some(view) => renderer.render(view, item.top, item.height),
                None => {
                    vwarn!(index = item.index, "layout item does not resolve against groups");
                }
            }
        }
    }

    /// The scroll offset that brings `id` to the top of the viewport, clamped to the scrollable
    /// range. `None` if the group no longer exists or emitted no items.
    pub fn group_scroll_offset(&self, id: &K) -> Option<u64> {
        self.layout
            .group_offset(id)
            .map(|top| self.clamp_scroll_top(top))
    }

    /// Jumps to a group (no animation).
    ///
    /// Unknown ids are a silent no-op returning `None`; otherwise the applied offset is
    /// returned.
    pub fn scroll_to_group(&mut self, id: &K) -> Option<u64> {
        let Some(offset) = self.group_scroll_offset(id) else {
            vtrace!("scroll_to_group: unknown group");
            return None;
        };
        self.set_scroll_top(offset);
        Some(offset)
    }

    /// The group covering the top edge of the viewport.
    pub fn active_group(&self) -> Option<&Group<K, R>> {
        let index = self.layout.group_index_at(self.viewport.scroll_top)?;
        self.groups.get(index)
    }

    /// The header of the active group once it has scrolled above the viewport, for sticky
    /// rendering.
    pub fn pinned_header(&self) -> Option<VirtualItem> {
        let scroll_top = self.viewport.scroll_top;
        let group = self.layout.group_index_at(scroll_top)?;
        let header = self.layout.header_for_group(group)?;
        (header.top < scroll_top).then_some(*header)
    }

    fn planned_columns(&self) -> usize {
        match (self.options.flatten.mode, self.options.grid) {
            (GroupMode::Grid, Some(grid)) => {
                compute_columns(self.viewport.container_width, grid.item_width, grid.gap)
            }
            _ => self.options.flatten.effective_columns(),
        }
    }

    fn relayout(&mut self) {
        let flatten_options = FlattenOptions {
            columns: self.columns,
            ..self.options.flatten
        };
        self.layout = Arc::new(flatten(&self.groups, &flatten_options));
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<K, R> core::fmt::Debug for CatalogVirtualizer<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogVirtualizer")
            .field("options", &self.options)
            .field("groups", &self.groups.len())
            .field("viewport", &self.viewport)
            .field("columns", &self.columns)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
