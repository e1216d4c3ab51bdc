#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Bounds required of a group identity.
///
/// With `std` this is `Hash + Eq` (the group index is a `HashMap`); without it, `Ord`.
#[cfg(feature = "std")]
pub trait GroupKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> GroupKey for K {}

#[cfg(not(feature = "std"))]
pub trait GroupKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> GroupKey for K {}

/// Group id → (group position, top offset of its first item).
#[cfg(feature = "std")]
pub(crate) type GroupOffsetMap<K> = HashMap<K, (usize, u64)>;
#[cfg(not(feature = "std"))]
pub(crate) type GroupOffsetMap<K> = BTreeMap<K, (usize, u64)>;
