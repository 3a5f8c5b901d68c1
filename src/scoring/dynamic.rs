//! Dynamic Provision Scorer
//!
//! Shape-free scoring for claims that would be dynamically provisioned on
//! the node. The score is the floored mean utilization percentage across
//! storage classes and is not capped at 100.

use super::resource::{ClassResourceMap, StorageResource};
use super::{Score, MAX_UTILIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// =============================================================================
// Dynamic Provision
// =============================================================================

/// The claim side of a dynamic provision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionClaim {
    /// Claim name, used for diagnostics only
    #[serde(default)]
    pub name: String,
    /// Storage class the volume will be provisioned from; never empty
    pub storage_class_name: String,
    /// Requested bytes
    pub requested: u64,
}

/// Capacity reported for the claim's storage class on the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityInfo {
    /// Capacity in bytes
    pub capacity: u64,
}

/// A claim that needs a volume provisioned on the node under evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicProvision {
    pub claim: ProvisionClaim,
    /// Absent when no capacity record exists for the (node, class) pair
    #[serde(default)]
    pub capacity: Option<CapacityInfo>,
}

impl DynamicProvision {
    pub fn new(storage_class_name: impl Into<String>, requested: u64, capacity: Option<u64>) -> Self {
        Self {
            claim: ProvisionClaim {
                name: String::new(),
                storage_class_name: storage_class_name.into(),
                requested,
            },
            capacity: capacity.map(|capacity| CapacityInfo { capacity }),
        }
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Group provisions by storage class
///
/// Provisions without a capacity record are skipped. Requested bytes are
/// summed; capacity keeps the largest value reported for the class.
pub fn aggregate_dynamic_provisions(provisions: &[DynamicProvision]) -> ClassResourceMap {
    let mut classes = ClassResourceMap::new();
    for provision in provisions {
        let Some(info) = provision.capacity else {
            debug!(
                claim = %provision.claim.name,
                class = %provision.claim.storage_class_name,
                "no capacity record, skipping provision"
            );
            continue;
        };
        classes.add_provision(
            &provision.claim.storage_class_name,
            provision.claim.requested,
            info.capacity,
        );
    }
    classes
}

/// Utilization percentage for one class
///
/// A class whose known capacity is zero saturates at 100 percent.
pub fn utilization_percent(class: &str, resource: &StorageResource) -> f64 {
    if resource.capacity == 0 {
        warn!(
            class = %class,
            requested = resource.requested,
            "zero capacity reported, saturating utilization"
        );
        return MAX_UTILIZATION as f64;
    }
    (resource.requested as f64 / resource.capacity as f64) * 100.0
}

/// Floored mean utilization percentage across storage classes
pub fn score_dynamic_provisions(provisions: &[DynamicProvision]) -> Score {
    let classes = aggregate_dynamic_provisions(provisions);
    if classes.is_empty() {
        return 0;
    }

    let total: f64 = classes
        .iter()
        .map(|(class, resource)| utilization_percent(class, resource))
        .sum();
    let score = (total / classes.len() as f64).floor() as Score;

    debug!(classes = classes.len(), score, "scored dynamic provisions");
    score
}
