//! Pod Volumes
//!
//! The volumes a pod needs on one candidate node, reduced to the handful of
//! fields scoring reads, plus adapters from the Kubernetes object model.

use crate::error::{Error, Result};
use crate::quantity::quantity_bytes;
use crate::scoring::{CapacityInfo, ClassResourceMap, DynamicProvision, ProvisionClaim, StorageResource};
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim};
use k8s_openapi::api::storage::v1::CSIStorageCapacity;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource name for storage requests and capacities
const RESOURCE_STORAGE: &str = "storage";

// =============================================================================
// Static Binding
// =============================================================================

/// A claim matched to an existing persistent volume on the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticBinding {
    /// Claim name, used for diagnostics only
    #[serde(default)]
    pub claim_name: String,
    /// Storage class of the bound volume
    #[serde(default)]
    pub storage_class_name: String,
    /// Bytes requested by the claim
    pub requested: u64,
    /// Capacity of the volume in bytes
    pub capacity: u64,
}

impl StaticBinding {
    pub fn new(storage_class_name: impl Into<String>, requested: u64, capacity: u64) -> Self {
        Self {
            claim_name: String::new(),
            storage_class_name: storage_class_name.into(),
            requested,
            capacity,
        }
    }

    /// Build a binding from a claim and the volume it would bind to
    pub fn from_objects(claim: &PersistentVolumeClaim, volume: &PersistentVolume) -> Result<Self> {
        let requested = claim
            .spec
            .as_ref()
            .and_then(|spec| spec.resources.as_ref())
            .and_then(|resources| resources.requests.as_ref());
        let volume_spec = volume.spec.as_ref();
        let capacity = volume_spec.and_then(|spec| spec.capacity.as_ref());

        Ok(Self {
            claim_name: object_key(&claim.metadata),
            storage_class_name: volume_spec
                .and_then(|spec| spec.storage_class_name.clone())
                .unwrap_or_default(),
            requested: storage_bytes(requested)?,
            capacity: storage_bytes(capacity)?,
        })
    }

    pub fn resource(&self) -> StorageResource {
        StorageResource::new(self.requested, self.capacity)
    }
}

// =============================================================================
// Dynamic Provision Adapter
// =============================================================================

impl DynamicProvision {
    /// Build a provision from a claim and the capacity reported for its
    /// storage class on the node, if any
    pub fn from_objects(
        claim: &PersistentVolumeClaim,
        capacity: Option<&CSIStorageCapacity>,
    ) -> Result<Self> {
        let name = object_key(&claim.metadata);
        let spec = claim.spec.as_ref();

        let storage_class_name = spec
            .and_then(|spec| spec.storage_class_name.clone())
            .filter(|class| !class.is_empty())
            .ok_or_else(|| Error::MissingStorageClass { claim: name.clone() })?;

        let requested = spec
            .and_then(|spec| spec.resources.as_ref())
            .and_then(|resources| resources.requests.as_ref());

        let capacity = capacity
            .map(|record| -> Result<CapacityInfo> {
                let bytes = record.capacity.as_ref().map(quantity_bytes).transpose()?;
                Ok(CapacityInfo {
                    capacity: bytes.unwrap_or(0),
                })
            })
            .transpose()?;

        Ok(Self {
            claim: ProvisionClaim {
                name,
                storage_class_name,
                requested: storage_bytes(requested)?,
            },
            capacity,
        })
    }
}

/// "namespace/name" for diagnostics
fn object_key(meta: &ObjectMeta) -> String {
    let name = meta.name.as_deref().unwrap_or_default();
    match meta.namespace.as_deref() {
        Some(namespace) => format!("{}/{}", namespace, name),
        None => name.to_string(),
    }
}

/// Storage quantity from a resource list; absent means zero
fn storage_bytes(resources: Option<&BTreeMap<String, Quantity>>) -> Result<u64> {
    resources
        .and_then(|list| list.get(RESOURCE_STORAGE))
        .map(quantity_bytes)
        .transpose()
        .map(Option::unwrap_or_default)
}

// =============================================================================
// Pod Volumes
// =============================================================================

/// Volumes a pod would bind or provision on one candidate node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodVolumes {
    #[serde(default)]
    pub static_bindings: Vec<StaticBinding>,
    #[serde(default)]
    pub dynamic_provisions: Vec<DynamicProvision>,
}

impl PodVolumes {
    pub fn is_empty(&self) -> bool {
        self.static_bindings.is_empty() && self.dynamic_provisions.is_empty()
    }

    /// Group static bindings by storage class, summing demand and capacity
    pub fn static_class_resources(&self) -> ClassResourceMap {
        let mut classes = ClassResourceMap::new();
        for binding in &self.static_bindings {
            let resource = binding.resource();
            classes.add_bound(&binding.storage_class_name, resource.requested, resource.capacity);
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn claim(class: Option<&str>, request: &str) -> PersistentVolumeClaim {
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolumeClaim",
            "metadata": {"name": "data", "namespace": "default"},
            "spec": {
                "storageClassName": class,
                "resources": {"requests": {"storage": request}}
            }
        }))
        .unwrap()
    }

    fn volume(class: &str, capacity: &str) -> PersistentVolume {
        serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PersistentVolume",
            "metadata": {"name": "pv-1"},
            "spec": {
                "storageClassName": class,
                "capacity": {"storage": capacity}
            }
        }))
        .unwrap()
    }

    fn storage_capacity(class: &str, capacity: Option<&str>) -> CSIStorageCapacity {
        serde_json::from_value(json!({
            "apiVersion": "storage.k8s.io/v1",
            "kind": "CSIStorageCapacity",
            "metadata": {"name": "cap-1", "namespace": "kube-system"},
            "storageClassName": class,
            "capacity": capacity
        }))
        .unwrap()
    }

    #[test]
    fn test_static_binding_from_objects() {
        let binding =
            StaticBinding::from_objects(&claim(Some("gold"), "10Gi"), &volume("gold", "20Gi"))
                .unwrap();
        assert_eq!(binding.claim_name, "default/data");
        assert_eq!(binding.storage_class_name, "gold");
        assert_eq!(binding.requested, 10 << 30);
        assert_eq!(binding.capacity, 20 << 30);
        assert_eq!(binding.resource(), StorageResource::new(10 << 30, 20 << 30));
    }

    #[test]
    fn test_static_binding_missing_fields() {
        let binding = StaticBinding::from_objects(
            &PersistentVolumeClaim::default(),
            &PersistentVolume::default(),
        )
        .unwrap();
        assert_eq!(binding.storage_class_name, "");
        assert_eq!(binding.requested, 0);
        assert_eq!(binding.capacity, 0);
    }

    #[test]
    fn test_dynamic_provision_from_objects() {
        let capacity = storage_capacity("gold", Some("100Gi"));
        let provision =
            DynamicProvision::from_objects(&claim(Some("gold"), "5Gi"), Some(&capacity)).unwrap();
        assert_eq!(provision.claim.storage_class_name, "gold");
        assert_eq!(provision.claim.requested, 5 << 30);
        assert_eq!(provision.capacity, Some(CapacityInfo { capacity: 100 << 30 }));

        let provision = DynamicProvision::from_objects(&claim(Some("gold"), "5Gi"), None).unwrap();
        assert_eq!(provision.capacity, None);

        let unknown = storage_capacity("gold", None);
        let provision =
            DynamicProvision::from_objects(&claim(Some("gold"), "5Gi"), Some(&unknown)).unwrap();
        assert_eq!(provision.capacity, Some(CapacityInfo { capacity: 0 }));
    }

    #[test]
    fn test_dynamic_provision_requires_class() {
        assert_matches!(
            DynamicProvision::from_objects(&claim(None, "5Gi"), None),
            Err(Error::MissingStorageClass { claim }) if claim == "default/data"
        );
        assert_matches!(
            DynamicProvision::from_objects(&claim(Some(""), "5Gi"), None),
            Err(Error::MissingStorageClass { .. })
        );
    }

    #[test]
    fn test_bad_quantity() {
        assert_matches!(
            StaticBinding::from_objects(&claim(Some("gold"), "lots"), &volume("gold", "1Gi")),
            Err(Error::QuantityParse(_))
        );
    }

    #[test]
    fn test_static_class_resources() {
        let volumes = PodVolumes {
            static_bindings: vec![
                StaticBinding::new("gold", 10, 100),
                StaticBinding::new("gold", 20, 50),
                StaticBinding::new("silver", 5, 10),
            ],
            dynamic_provisions: Vec::new(),
        };
        let classes = volumes.static_class_resources();
        assert_eq!(classes.get("gold"), Some(&StorageResource::new(30, 150)));
        assert_eq!(classes.get("silver"), Some(&StorageResource::new(5, 10)));
    }
}
