//! Plugin Module
//!
//! The volume binding score extension point and the inputs it consumes.

pub mod snapshot;
pub mod volume_binding;
pub mod volumes;

pub use snapshot::*;
pub use volume_binding::*;
pub use volumes::*;
