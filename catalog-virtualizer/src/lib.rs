//! A headless engine for virtualized, grouped catalog views.
//!
//! For adapter-level utilities (viewport observation, animated scroll-to-group, anchoring), see
//! the `catalog-virtualizer-adapter` crate.
//!
//! The engine turns an ordered list of groups (optional header, records, or pre-split sections
//! such as album discs) into a flat sequence of positioned items, plans grid columns from the
//! container width, and finds the items intersecting the viewport by binary search. Only that
//! buffered slice is handed to your renderer; everything else stays virtual.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - container size (width/height) and scroll offset
//! - a renderer for headers, section headers, rows and records
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod columns;
mod group;
mod key;
mod layout;
mod options;
mod render;
mod types;
mod virtualizer;

#[cfg(test)]
mod tests;

pub use columns::compute_columns;
pub use group::{Group, GroupBody, Section, group_by_initial, initial_of, split_sections};
pub use key::GroupKey;
pub use layout::{FlattenedLayout, flatten, visible_range};
pub use options::{FlattenOptions, GridOptions, OnChangeCallback, VirtualizerOptions};
pub use render::ItemRenderer;
pub use types::{GroupMode, ItemKind, ItemView, Viewport, VirtualItem, VisibleRange};
pub use virtualizer::CatalogVirtualizer;
