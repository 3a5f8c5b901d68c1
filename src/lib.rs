//! Volume Capacity Scorer
//!
//! Capacity-aware node scoring for the volume binding extension point of a
//! Kubernetes scheduler. Given the volumes a pod would bind or provision on
//! a candidate node, produces one integer score ranking how well the node's
//! storage capacity fits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Volume Binding Score                           │
//! │        (static bindings → shaped, else → dynamic provision)       │
//! ├─────────────────────────────────┬────────────────────────────────┤
//! │      Volume Capacity Scorer     │    Dynamic Provision Scorer    │
//! │  (utilization shape, weighted   │  (floored mean utilization %,  │
//! │   mean, saturates at 100)       │   max capacity per class)      │
//! ├─────────────────────────────────┴────────────────────────────────┤
//! │               Class Resource Map (per storage class)              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`scoring`]: Resource aggregation, shapes, weighting and both scorers
//! - [`plugin`]: Node-score entry point, pod volumes and object adapters
//! - [`config`]: Plugin configuration
//! - [`quantity`]: Kubernetes quantity parsing
//! - [`error`]: Error types and handling

pub mod config;
pub mod error;
pub mod plugin;
pub mod quantity;
pub mod scoring;

// Re-export commonly used types
pub use config::{UtilizationShapePoint, VolumeBindingArgs};

pub use error::{Error, Result};

pub use plugin::{
    NodeScore, NodeVolumes, PodVolumes, ScoringSnapshot, StaticBinding, VolumeBindingScore,
};

pub use scoring::{
    build_scorer_function, score_dynamic_provisions, ClassResourceMap, ClassWeigher, ClassWeights,
    DynamicProvision, FunctionShape, FunctionShapePoint, Score, StorageResource, UniformWeights,
    VolumeCapacityScorer, MAX_NODE_SCORE, MAX_UTILIZATION,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
