//! Client-side response cache.
//!
//! Each resource kind owns exactly one slot in a [`SlotStore`]. A
//! [`ResourceCache`] serves the slot while the [`FreshnessPolicy`] accepts it
//! and otherwise fetches, overwrites the slot and returns the new payload.
//!
//! Freshness has three dimensions, checked in this order:
//! - scope: the stored zone must be the requested zone
//! - reference date: zone-scoped data must have been computed for today
//! - age: at most five minutes by default

pub mod entry;
pub mod freshness;
pub mod resource;
pub mod store;

pub use entry::CacheEntry;
pub use freshness::{Freshness, FreshnessContext, FreshnessPolicy, StaleReason};
pub use resource::{CacheSettings, ResourceCache};
pub use store::{FileSlotStore, MemorySlotStore, SlotStore};
