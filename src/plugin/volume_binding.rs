//! Volume Binding Score
//!
//! Node-score entry point. Called once per candidate node with the volumes
//! the pod would bind or provision there.

use super::volumes::PodVolumes;
use crate::config::VolumeBindingArgs;
use crate::error::Result;
use crate::scoring::{score_dynamic_provisions, Score, VolumeCapacityScorer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// =============================================================================
// Node Score
// =============================================================================

/// Score computed for one candidate node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeScore {
    pub node: String,
    pub score: Score,
}

// =============================================================================
// Volume Binding Score
// =============================================================================

/// Capacity-aware scoring for the volume binding extension point
#[derive(Debug, Clone)]
pub struct VolumeBindingScore {
    /// Shaped scorer; absent when volume capacity priority is disabled
    scorer: Option<VolumeCapacityScorer>,
    /// Score dynamic provisions when the pod has no static bindings
    storage_capacity_scoring: bool,
}

impl VolumeBindingScore {
    pub fn new(scorer: Option<VolumeCapacityScorer>, storage_capacity_scoring: bool) -> Self {
        Self {
            scorer,
            storage_capacity_scoring,
        }
    }

    /// Validate args and build the plugin
    pub fn from_args(args: &VolumeBindingArgs) -> Result<Self> {
        args.validate()?;
        info!(
            "Volume binding scoring: capacity priority={}, storage capacity scoring={}, shape points={}",
            args.volume_capacity_priority,
            args.storage_capacity_scoring,
            args.shape.len()
        );
        Ok(Self::new(args.build_scorer(), args.storage_capacity_scoring))
    }

    pub fn is_enabled(&self) -> bool {
        self.scorer.is_some()
    }

    /// Score one node
    ///
    /// Static bindings are scored through the configured shape. Dynamic
    /// provisions are only scored when the pod has no static bindings and
    /// storage capacity scoring is enabled.
    pub fn score(&self, volumes: &PodVolumes) -> Score {
        let Some(scorer) = &self.scorer else {
            return 0;
        };
        if volumes.is_empty() {
            return 0;
        }

        if !volumes.static_bindings.is_empty() || !self.storage_capacity_scoring {
            let classes = volumes.static_class_resources();
            return scorer.score(&classes);
        }

        score_dynamic_provisions(&volumes.dynamic_provisions)
    }

    /// Score several candidate nodes independently
    pub fn score_nodes<'a, I>(&self, nodes: I) -> Vec<NodeScore>
    where
        I: IntoIterator<Item = (&'a str, &'a PodVolumes)>,
    {
        nodes
            .into_iter()
            .map(|(node, volumes)| {
                let score = self.score(volumes);
                debug!(node = %node, score, "scored node");
                NodeScore {
                    node: node.to_string(),
                    score,
                }
            })
            .collect()
    }
}

impl Default for VolumeBindingScore {
    fn default() -> Self {
        let args = VolumeBindingArgs::default();
        Self::new(args.build_scorer(), args.storage_capacity_scoring)
    }
}
