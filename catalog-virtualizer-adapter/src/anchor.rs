use core::fmt;

use catalog_virtualizer::{CatalogVirtualizer, GroupKey};

/// A scroll position expressed relative to a group, so it survives relayouts.
///
/// Typical use cases:
/// - a grid resize that changes the column count (every offset below the first group moves)
/// - replacing the groups after a filter change while the user keeps looking at the same group
#[derive(Clone, PartialEq, Eq)]
pub struct ScrollAnchor<K> {
    pub group: K,
    /// Distance from the group's first item to the viewport's scroll offset.
    pub offset_in_group: u64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("group", &self.group)
            .field("offset_in_group", &self.offset_in_group)
            .finish()
    }
}

/// Captures an anchor for the group covering the top edge of the viewport.
///
/// Returns `None` when the layout is empty or the viewport is past its end.
pub fn capture_anchor<K: GroupKey, R>(v: &CatalogVirtualizer<K, R>) -> Option<ScrollAnchor<K>> {
    let group = v.active_group()?;
    let top = v.layout().group_offset(&group.id)?;
    Some(ScrollAnchor {
        group: group.id.clone(),
        offset_in_group: v.scroll_top().saturating_sub(top),
    })
}

/// Applies a previously captured anchor against the current layout.
///
/// The in-group offset is clamped to the group's (possibly shorter) new extent, then to the
/// scrollable range. Returns `false`, leaving the scroll offset untouched, if the group is gone.
pub fn apply_anchor<K: GroupKey, R>(
    v: &mut CatalogVirtualizer<K, R>,
    anchor: &ScrollAnchor<K>,
) -> bool {
    let layout = v.layout();
    let Some(group) = layout.group_position(&anchor.group) else {
        return false;
    };
    let items = layout.group_items(group);
    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return false;
    };
    let extent = last.bottom().saturating_sub(first.top);
    let offset = anchor.offset_in_group.min(extent.saturating_sub(1));
    let target = first.top.saturating_add(offset);
    v.set_scroll_top_clamped(target);
    true
}
