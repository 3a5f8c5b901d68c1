//! Class Weighting
//!
//! Strategies deciding how much each storage class contributes to a node's
//! mean score. Uniform weighting is the default.

use super::resource::StorageResource;
use std::collections::BTreeMap;

/// Weight assigned to a storage class when averaging per-class scores
pub trait ClassWeigher: Send + Sync {
    fn weight(&self, class: &str, resource: &StorageResource) -> u64;
}

/// Every class counts the same regardless of size
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformWeights;

impl ClassWeigher for UniformWeights {
    fn weight(&self, _class: &str, _resource: &StorageResource) -> u64 {
        1
    }
}

/// Fixed per-class weights, with a fallback for unlisted classes
#[derive(Debug, Clone)]
pub struct ClassWeights {
    weights: BTreeMap<String, u64>,
    default_weight: u64,
}

impl ClassWeights {
    pub fn new(weights: BTreeMap<String, u64>) -> Self {
        Self {
            weights,
            default_weight: 1,
        }
    }

    pub fn with_default_weight(mut self, default_weight: u64) -> Self {
        self.default_weight = default_weight;
        self
    }
}

impl ClassWeigher for ClassWeights {
    fn weight(&self, class: &str, _resource: &StorageResource) -> u64 {
        self.weights
            .get(class)
            .copied()
            .unwrap_or(self.default_weight)
    }
}
