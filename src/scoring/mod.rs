//! Scoring Module
//!
//! The two capacity scoring algorithms and the data model they share.

pub mod capacity;
pub mod dynamic;
pub mod resource;
pub mod shape;
pub mod weights;

pub use capacity::*;
pub use dynamic::*;
pub use resource::*;
pub use shape::*;
pub use weights::*;

/// Node score; higher is more preferred
pub type Score = i64;

/// Highest utilization percentage a shape is evaluated at
pub const MAX_UTILIZATION: i64 = 100;

/// Highest score a node can receive from a plugin
pub const MAX_NODE_SCORE: i64 = 100;

/// Highest score accepted in a configured utilization shape
pub const MAX_CUSTOM_PRIORITY_SCORE: i64 = 10;
