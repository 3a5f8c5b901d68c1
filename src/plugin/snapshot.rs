//! Scoring Snapshot
//!
//! Input document for offline scoring: the candidate nodes of one pod and
//! the volumes it would bind or provision on each. Quantities accept either
//! plain byte counts or Kubernetes quantity strings.

use super::volumes::{PodVolumes, StaticBinding};
use crate::error::{Error, Result};
use crate::quantity::parse_quantity;
use crate::scoring::DynamicProvision;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A byte count or a quantity string ("10Gi")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Bytes(u64),
    Text(String),
}

impl QuantityValue {
    pub fn bytes(&self) -> Result<u64> {
        match self {
            QuantityValue::Bytes(bytes) => Ok(*bytes),
            QuantityValue::Text(text) => parse_quantity(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingEntry {
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub storage_class_name: String,
    pub requested: QuantityValue,
    pub capacity: QuantityValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionEntry {
    #[serde(default)]
    pub claim: String,
    #[serde(default)]
    pub storage_class_name: String,
    pub requested: QuantityValue,
    /// Capacity reported for the class on this node, if any
    #[serde(default)]
    pub capacity: Option<QuantityValue>,
}

/// Volumes of the pod on one candidate node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVolumes {
    pub name: String,
    #[serde(default)]
    pub static_bindings: Vec<BindingEntry>,
    #[serde(default)]
    pub dynamic_provisions: Vec<ProvisionEntry>,
}

impl NodeVolumes {
    pub fn pod_volumes(&self) -> Result<PodVolumes> {
        let static_bindings = self
            .static_bindings
            .iter()
            .map(|entry| -> Result<StaticBinding> {
                Ok(StaticBinding {
                    claim_name: entry.claim.clone(),
                    storage_class_name: entry.storage_class_name.clone(),
                    requested: entry.requested.bytes()?,
                    capacity: entry.capacity.bytes()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let dynamic_provisions = self
            .dynamic_provisions
            .iter()
            .map(|entry| -> Result<DynamicProvision> {
                if entry.storage_class_name.is_empty() {
                    return Err(Error::MissingStorageClass {
                        claim: entry.claim.clone(),
                    });
                }
                let capacity = entry.capacity.as_ref().map(QuantityValue::bytes).transpose()?;
                let mut provision =
                    DynamicProvision::new(&entry.storage_class_name, entry.requested.bytes()?, capacity);
                provision.claim.name = entry.claim.clone();
                Ok(provision)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PodVolumes {
            static_bindings,
            dynamic_provisions,
        })
    }
}

/// Candidate nodes for one pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeVolumes>,
}

impl ScoringSnapshot {
    /// Parse a YAML (or JSON) snapshot
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let snapshot: Self = serde_yaml::from_str(yaml)?;
        if let Some(index) = snapshot.nodes.iter().position(|n| n.name.is_empty()) {
            return Err(Error::Configuration(format!(
                "node entry {} has no name",
                index
            )));
        }
        Ok(snapshot)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scoring snapshot from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Resolve every node's volumes, paired with the node name
    pub fn resolve(&self) -> Result<Vec<(String, PodVolumes)>> {
        self.nodes
            .iter()
            .map(|node| -> Result<(String, PodVolumes)> {
                Ok((node.name.clone(), node.pod_volumes()?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SNAPSHOT: &str = r#"
nodes:
  - name: node-a
    staticBindings:
      - claim: default/data
        storageClassName: gold
        requested: 10Gi
        capacity: 20Gi
  - name: node-b
    dynamicProvisions:
      - claim: default/logs
        storageClassName: gold
        requested: 50
        capacity: 200
      - claim: default/cache
        storageClassName: silver
        requested: 1Gi
"#;

    #[test]
    fn test_parse_and_resolve() {
        let snapshot = ScoringSnapshot::from_yaml_str(SNAPSHOT).unwrap();
        let resolved = snapshot.resolve().unwrap();
        assert_eq!(resolved.len(), 2);

        let (name, volumes) = &resolved[0];
        assert_eq!(name, "node-a");
        assert_eq!(volumes.static_bindings[0].requested, 10 << 30);
        assert_eq!(volumes.static_bindings[0].capacity, 20 << 30);

        let (name, volumes) = &resolved[1];
        assert_eq!(name, "node-b");
        assert_eq!(volumes.dynamic_provisions.len(), 2);
        assert_eq!(volumes.dynamic_provisions[0], {
            let mut p = DynamicProvision::new("gold", 50, Some(200));
            p.claim.name = "default/logs".into();
            p
        });
        assert_eq!(volumes.dynamic_provisions[1].capacity, None);
    }

    #[test]
    fn test_missing_class_rejected() {
        let yaml = r#"
nodes:
  - name: node-a
    dynamicProvisions:
      - claim: default/data
        requested: 1Gi
"#;
        let snapshot = ScoringSnapshot::from_yaml_str(yaml).unwrap();
        assert_matches!(
            snapshot.resolve(),
            Err(Error::MissingStorageClass { claim }) if claim == "default/data"
        );
    }

    #[test]
    fn test_unnamed_node_rejected() {
        let yaml = "nodes: [{name: ''}]";
        assert_matches!(
            ScoringSnapshot::from_yaml_str(yaml),
            Err(Error::Configuration(_))
        );
    }

    #[test]
    fn test_bad_quantity() {
        let yaml = r#"
nodes:
  - name: node-a
    staticBindings:
      - storageClassName: gold
        requested: 10Qi
        capacity: 20Gi
"#;
        let snapshot = ScoringSnapshot::from_yaml_str(yaml).unwrap();
        assert_matches!(snapshot.resolve(), Err(Error::QuantityParse(_)));
    }

    #[test]
    fn test_from_file_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"nodes": [{"name": "node-a", "staticBindings": [{"storageClassName": "gold", "requested": 5, "capacity": 10}]}]}"#,
        )
        .unwrap();
        let snapshot = ScoringSnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.nodes[0].static_bindings[0].requested, QuantityValue::Bytes(5));
    }
}
