use alloc::sync::Arc;

use catalog_virtualizer::{CatalogVirtualizer, Group, GroupKey, Viewport, VirtualizerOptions};

use crate::{Easing, ScrollTween, ViewportChange, apply_anchor, capture_anchor};

/// A framework-neutral controller that wraps a [`CatalogVirtualizer`] and provides the
/// scroll-to-group workflows of catalog views (jump bars, "scroll target" props).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` (or `on_viewport_change`) when UI events occur
/// - `tick(now_ms)` each frame while [`Self::is_animating`], applying the returned offset to the
///   real scroll container
///
/// Relayouts caused by a resize or by new groups keep the group at the top of the viewport in
/// place, and retarget a running scroll-to-group animation.
#[derive(Clone, Debug)]
pub struct Controller<K, R> {
    v: CatalogVirtualizer<K, R>,
    tween: Option<ScrollTween>,
    // Group the running tween is heading to.
    tween_group: Option<K>,
    scroll_target: Option<K>,
    // The scroll target names a group that was not in the layout when it was set.
    target_pending: bool,
    duration_ms: u64,
    easing: Easing,
}

impl<K: GroupKey, R> Controller<K, R> {
    pub fn new(options: VirtualizerOptions<K, R>) -> Self {
        Self::from_virtualizer(CatalogVirtualizer::new(options))
    }

    pub fn from_virtualizer(v: CatalogVirtualizer<K, R>) -> Self {
        Self {
            v,
            tween: None,
            tween_group: None,
            scroll_target: None,
            target_pending: false,
            duration_ms: 300,
            easing: Easing::default(),
        }
    }

    /// Sets the scroll-to-group animation. A zero duration makes `scroll_to_group` jump.
    pub fn with_scroll_animation(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn virtualizer(&self) -> &CatalogVirtualizer<K, R> {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut CatalogVirtualizer<K, R> {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> CatalogVirtualizer<K, R> {
        self.v
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
        self.tween_group = None;
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// An offset that differs from the current one cancels any active animation (the user took
    /// over). While animating, reporting the offset last returned by [`Self::tick`] is the
    /// container echoing the controller's own write and keeps the animation running.
    pub fn on_scroll(&mut self, scroll_top: u64) {
        if self.is_animating() && scroll_top == self.v.scroll_top() {
            return;
        }
        self.cancel_animation();
        self.v.set_scroll_top(scroll_top);
    }

    /// Call this when the container is resized.
    ///
    /// If the resize changes the grid column count, the scroll offset is re-anchored to the
    /// group that was at the top of the viewport. Returns the scroll offset to apply to the
    /// container when it moved.
    pub fn on_resize(&mut self, width: u32, height: u32, now_ms: u64) -> Option<u64> {
        self.relayout_with(now_ms, |v| v.set_container_size(width, height))
    }

    /// Dispatches a [`crate::ViewportObserver`] notification.
    ///
    /// Returns the scroll offset to apply to the container, if it has to move.
    pub fn on_viewport_change(
        &mut self,
        viewport: Viewport,
        change: ViewportChange,
        now_ms: u64,
    ) -> Option<u64> {
        match change {
            ViewportChange::Scroll => {
                self.on_scroll(viewport.scroll_top);
                None
            }
            ViewportChange::Resize => {
                self.on_resize(viewport.container_width, viewport.container_height, now_ms)
            }
        }
    }

    /// Replaces the groups, keeping the group at the top of the viewport in place when it still
    /// exists. Returns the scroll offset to apply to the container when it moved.
    pub fn set_groups(
        &mut self,
        groups: impl Into<Arc<[Group<K, R>]>>,
        now_ms: u64,
    ) -> Option<u64> {
        self.relayout_with(now_ms, |v| v.set_groups(groups))
    }

    fn relayout_with(
        &mut self,
        now_ms: u64,
        f: impl FnOnce(&mut CatalogVirtualizer<K, R>),
    ) -> Option<u64> {
        let generation = self.v.layout_generation();
        let before = self.v.scroll_top();
        let anchor = capture_anchor(&self.v);

        f(&mut self.v);

        if self.v.layout_generation() == generation {
            return None;
        }
        adebug!(generation = self.v.layout_generation(), "relayout");

        if let Some(group) = self.tween_group.clone() {
            let retargeted = match (self.v.group_scroll_offset(&group), self.tween.as_mut()) {
                (Some(to), Some(tween)) => {
                    tween.retarget(now_ms, to);
                    true
                }
                _ => false,
            };
            if !retargeted {
                self.cancel_animation();
            }
        }
        if self.tween.is_none() {
            if let Some(anchor) = anchor {
                apply_anchor(&mut self.v, &anchor);
            }
        }
        if self.target_pending {
            if let Some(id) = self.scroll_target.clone() {
                if self.scroll_to_group(&id, now_ms).is_some() {
                    self.target_pending = false;
                }
            }
        }

        let after = self.v.scroll_top();
        (after != before).then_some(after)
    }

    /// Advances the scroll animation.
    ///
    /// Returns the new offset while a tween is active, `None` otherwise.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let tween = self.tween?;

        let offset = tween.sample(now_ms);
        self.v.set_scroll_top_clamped(offset);

        if tween.is_done(now_ms) {
            self.cancel_animation();
        }

        Some(self.v.scroll_top())
    }

    /// Animates the scroll offset to a group's first item.
    ///
    /// Unknown groups (filtered out, deleted) are a silent no-op returning `None`. Otherwise the
    /// clamped target offset is returned; call [`Self::tick`] to advance the animation.
    pub fn scroll_to_group(&mut self, id: &K, now_ms: u64) -> Option<u64> {
        let Some(to) = self.v.group_scroll_offset(id) else {
            atrace!("scroll_to_group: unknown group");
            return None;
        };
        if self.duration_ms == 0 {
            self.cancel_animation();
            self.v.set_scroll_top(to);
            return Some(to);
        }

        let from = self.v.scroll_top();
        self.tween = Some(ScrollTween::new(from, to, now_ms, self.duration_ms, self.easing));
        self.tween_group = Some(id.clone());
        adebug!(from, to, "scroll_to_group: animating");
        Some(to)
    }

    /// Jumps to a group immediately (no animation). Unknown groups are a no-op.
    pub fn jump_to_group(&mut self, id: &K) -> Option<u64> {
        let offset = self.v.scroll_to_group(id)?;
        self.cancel_animation();
        Some(offset)
    }

    pub fn scroll_target(&self) -> Option<&K> {
        self.scroll_target.as_ref()
    }

    /// Reactive form of [`Self::scroll_to_group`]: scrolls only when `target` differs from the
    /// previous target. Clearing the target (`None`) never scrolls.
    ///
    /// A target whose group is not laid out yet stays pending: the scroll starts on the first
    /// relayout ([`Self::set_groups`], [`Self::on_resize`]) that contains it.
    pub fn set_scroll_target(&mut self, target: Option<K>, now_ms: u64) -> Option<u64> {
        if self.scroll_target == target {
            return None;
        }
        self.scroll_target = target;
        self.target_pending = false;
        let id = self.scroll_target.clone()?;
        let offset = self.scroll_to_group(&id, now_ms);
        self.target_pending = offset.is_none();
        offset
    }
}
