//! Adapter utilities for the `catalog-virtualizer` crate.
//!
//! The `catalog-virtualizer` crate is UI-agnostic and focuses on layout math and state. This
//! crate provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - Viewport observation with a resize binding tied to the element's mounted lifetime
//! - Scroll-to-group, both imperative and as a reactive "scroll target", with tween animation
//! - Scroll anchoring across relayouts (column changes, group replacement)
//! - Frame gating for consumers that repaint per animation frame
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod frame_gate;
mod tween;
mod viewport;


pub use anchor::{ScrollAnchor, apply_anchor, capture_anchor};
pub use controller::Controller;
pub use frame_gate::FrameGate;
pub use tween::{Easing, ScrollTween};
pub use viewport::{ListenerId, ResizeSubscription, ViewportChange, ViewportObserver};
