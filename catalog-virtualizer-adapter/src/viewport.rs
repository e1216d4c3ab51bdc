use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::mem;

use catalog_virtualizer::Viewport;

/// What changed in a viewport notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewportChange {
    Scroll,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(Viewport, ViewportChange)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Id of the live resize binding, if any.
    binding: Option<u64>,
    listeners: Vec<(ListenerId, u64, Listener)>,
    // Listeners taken out for the current dispatch, and those unsubscribed meanwhile.
    dispatching: Vec<ListenerId>,
    removed_while_dispatching: Vec<ListenerId>,
}

/// Tracks the scroll offset and container size of one mounted list/grid.
///
/// Scroll events are applied synchronously, one per event, without throttling. Size changes
/// only flow while a resize binding is alive: [`Self::bind`] hands out a [`ResizeSubscription`]
/// guard for the element's mounted lifetime, and dropping it (unmount) unbinds the observer and
/// releases every listener registered through it.
///
/// Single-threaded by construction (`Rc`), like the UI thread that drives it.
pub struct ViewportObserver {
    viewport: Viewport,
    registry: Rc<RefCell<Registry>>,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_bound(&self) -> bool {
        self.registry.borrow().binding.is_some()
    }

    /// Binds the resize notifications to the scroll element.
    ///
    /// A new binding supersedes the previous one: listeners of the old guard are released and
    /// dropping the old guard later has no effect.
    pub fn bind(&self) -> ResizeSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        if let Some(prev) = registry.binding.replace(id) {
            registry.listeners.retain(|(_, binding, _)| *binding != prev);
        }
        adebug!(binding = id, "resize observer bound");
        ResizeSubscription {
            binding: id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Reports a scroll event. Returns `true` if the offset changed.
    pub fn on_scroll(&mut self, scroll_top: u64) -> bool {
        if self.viewport.scroll_top == scroll_top {
            return false;
        }
        self.viewport.scroll_top = scroll_top;
        self.emit(ViewportChange::Scroll);
        true
    }

    /// Reports a resize notification. Ignored (returns `false`) while unbound or when the size
    /// did not change.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if !self.is_bound() {
            atrace!(width, height, "resize ignored: observer not bound");
            return false;
        }
        if self.viewport.container_width == width && self.viewport.container_height == height {
            return false;
        }
        self.viewport.container_width = width;
        self.viewport.container_height = height;
        self.emit(ViewportChange::Resize);
        true
    }

    fn emit(&self, change: ViewportChange) {
        // Listeners run without the registry borrowed so they may (un)subscribe.
        let mut listeners = {
            let mut registry = self.registry.borrow_mut();
            let listeners = mem::take(&mut registry.listeners);
            registry.dispatching = listeners.iter().map(|(id, _, _)| *id).collect();
            listeners
        };
        for (id, _, listener) in listeners.iter_mut() {
            if self.registry.borrow().removed_while_dispatching.contains(id) {
                continue;
            }
            listener(self.viewport, change);
        }
        let mut registry = self.registry.borrow_mut();
        let binding = registry.binding;
        let removed = mem::take(&mut registry.removed_while_dispatching);
        registry.dispatching.clear();
        let (mut keep, released): (Vec<_>, Vec<_>) = listeners
            .into_iter()
            .partition(|(id, b, _)| Some(*b) == binding && !removed.contains(id));
        keep.append(&mut registry.listeners);
        registry.listeners = keep;
        drop(registry);
        // Released listeners may own the subscription; drop them with the registry unborrowed.
        drop(released);
    }
}

impl Default for ViewportObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("ViewportObserver")
            .field("viewport", &self.viewport)
            .field("binding", &registry.binding)
            .field("listeners", &registry.listeners.len())
            .finish()
    }
}

/// A live resize binding. Dropping it unbinds the observer.
#[must_use = "dropping the subscription unbinds the resize observer"]
pub struct ResizeSubscription {
    binding: u64,
    registry: Weak<RefCell<Registry>>,
}

impl ResizeSubscription {
    /// Registers a listener for scroll and resize changes, released with this subscription.
    ///
    /// Returns `None` (and drops `listener`) when this binding is no longer active.
    pub fn subscribe(
        &self,
        listener: impl FnMut(Viewport, ViewportChange) + 'static,
    ) -> Option<ListenerId> {
        let registry = self.registry.upgrade()?;
        let mut registry = registry.borrow_mut();
        if registry.binding != Some(self.binding) {
            atrace!(binding = self.binding, "subscribe on inactive binding");
            return None;
        }
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, self.binding, Box::new(listener)));
        Some(id)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    ///
    /// May be called from inside a listener, including the one being removed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(lid, _, _)| *lid != id);
        if registry.listeners.len() != before {
            return true;
        }
        if registry.dispatching.contains(&id) && !registry.removed_while_dispatching.contains(&id) {
            registry.removed_while_dispatching.push(id);
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.borrow().binding == Some(self.binding))
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        if registry.binding != Some(self.binding) {
            return;
        }
        registry.binding = None;
        registry.listeners.clear();
        adebug!(binding = self.binding, "resize observer unbound");
    }
}

impl core::fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("binding", &self.binding)
            .field("active", &self.is_active())
            .finish()
    }
}
