//! Plugin Configuration
//!
//! `VolumeBindingArgs` is read once at plugin initialization, validated, and
//! turned into the shared scorer. Shapes are configured on a 0-10 score
//! scale and scaled up to node-score units before use.

use crate::error::{Error, Result};
use crate::scoring::{
    ClassWeigher, ClassWeights, FunctionShape, FunctionShapePoint, UniformWeights,
    VolumeCapacityScorer, MAX_CUSTOM_PRIORITY_SCORE, MAX_NODE_SCORE,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// Shape Points
// =============================================================================

/// A configured (utilization, score) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationShapePoint {
    /// Utilization percentage (0-100)
    pub utilization: i32,
    /// Score at this utilization (0-10)
    pub score: i32,
}

impl UtilizationShapePoint {
    pub fn new(utilization: i32, score: i32) -> Self {
        Self { utilization, score }
    }
}

/// Favour nodes whose storage is already most utilized
fn default_shape() -> Vec<UtilizationShapePoint> {
    vec![
        UtilizationShapePoint::new(0, 0),
        UtilizationShapePoint::new(100, MAX_CUSTOM_PRIORITY_SCORE as i32),
    ]
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Volume Binding Args
// =============================================================================

/// Arguments for the volume binding scoring plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBindingArgs {
    /// Utilization to score mapping, scores on a 0-10 scale
    #[serde(default = "default_shape")]
    pub shape: Vec<UtilizationShapePoint>,

    /// Score nodes by the capacity of volumes bound there
    #[serde(default = "default_true")]
    pub volume_capacity_priority: bool,

    /// Score nodes by the capacity available for dynamic provisioning
    #[serde(default = "default_true")]
    pub storage_capacity_scoring: bool,

    /// Per storage class weights; empty means every class counts the same
    #[serde(default)]
    pub class_weights: BTreeMap<String, u32>,
}

impl Default for VolumeBindingArgs {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            volume_capacity_priority: true,
            storage_capacity_scoring: true,
            class_weights: BTreeMap::new(),
        }
    }
}

impl VolumeBindingArgs {
    /// Parse and validate args from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let args: Self = serde_yaml::from_str(yaml)?;
        args.validate()?;
        Ok(args)
    }

    /// Load and validate args from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading volume binding args from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// The configured shape as given
    pub fn function_shape(&self) -> FunctionShape {
        FunctionShape::new(
            self.shape
                .iter()
                .map(|p| FunctionShapePoint::new(i64::from(p.utilization), i64::from(p.score)))
                .collect(),
        )
    }

    /// The configured shape scaled to node-score units
    pub fn scaled_shape(&self) -> FunctionShape {
        self.function_shape()
            .scaled(MAX_NODE_SCORE / MAX_CUSTOM_PRIORITY_SCORE)
    }

    /// Validate the args
    pub fn validate(&self) -> Result<()> {
        if self.volume_capacity_priority {
            self.function_shape().validate(MAX_CUSTOM_PRIORITY_SCORE)?;
        }

        if !self.class_weights.is_empty() && self.class_weights.values().all(|w| *w == 0) {
            return Err(Error::Configuration(
                "class weights must not all be zero".into(),
            ));
        }

        Ok(())
    }

    /// Class weighting strategy implied by the args
    pub fn weigher(&self) -> Arc<dyn ClassWeigher> {
        if self.class_weights.is_empty() {
            Arc::new(UniformWeights)
        } else {
            let weights = self
                .class_weights
                .iter()
                .map(|(class, weight)| (class.clone(), u64::from(*weight)))
                .collect();
            Arc::new(ClassWeights::new(weights))
        }
    }

    /// Build the shaped scorer, if volume capacity priority is enabled
    pub fn build_scorer(&self) -> Option<VolumeCapacityScorer> {
        self.volume_capacity_priority
            .then(|| VolumeCapacityScorer::with_weigher(self.scaled_shape(), self.weigher()))
    }

    /// JSON schema describing the args document
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(VolumeBindingArgs);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
