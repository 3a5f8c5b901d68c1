//! Storage Resources
//!
//! Per-class storage demand and capacity observed on one candidate node.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

// =============================================================================
// Storage Resource
// =============================================================================

/// Aggregated demand and capacity for one storage class on one node
///
/// A capacity of 0 means no usable capacity is known; scorers treat it as
/// saturation rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResource {
    /// Requested bytes
    pub requested: u64,
    /// Capacity in bytes
    pub capacity: u64,
}

impl StorageResource {
    pub fn new(requested: u64, capacity: u64) -> Self {
        Self { requested, capacity }
    }

    /// True when demand cannot be placed inside the known capacity
    pub fn is_saturated(&self) -> bool {
        self.capacity == 0 || self.requested > self.capacity
    }
}

// =============================================================================
// Class Resource Map
// =============================================================================

/// Storage resources keyed by storage class name
///
/// Backed by an ordered map so every consumer walks classes in the same
/// order regardless of how they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassResourceMap(BTreeMap<String, StorageResource>);

impl ClassResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, class: &str) -> Option<&StorageResource> {
        self.0.get(class)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, StorageResource> {
        self.0.iter()
    }

    /// Replace the resource recorded for a class
    pub fn insert(&mut self, class: impl Into<String>, resource: StorageResource) {
        self.0.insert(class.into(), resource);
    }

    /// Add a bound volume: both requested and capacity are summed per class
    pub fn add_bound(&mut self, class: &str, requested: u64, capacity: u64) {
        let entry = self.entry(class);
        entry.requested = entry.requested.saturating_add(requested);
        entry.capacity = entry.capacity.saturating_add(capacity);
    }

    /// Add a volume to provision: requested is summed, capacity keeps the
    /// largest slice reported for the class
    pub fn add_provision(&mut self, class: &str, requested: u64, capacity: u64) {
        let entry = self.entry(class);
        entry.requested = entry.requested.saturating_add(requested);
        entry.capacity = entry.capacity.max(capacity);
    }

    fn entry(&mut self, class: &str) -> &mut StorageResource {
        self.0.entry(class.to_string()).or_default()
    }
}

impl FromIterator<(String, StorageResource)> for ClassResourceMap {
    fn from_iter<I: IntoIterator<Item = (String, StorageResource)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ClassResourceMap {
    type Item = (&'a String, &'a StorageResource);
    type IntoIter = btree_map::Iter<'a, String, StorageResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
