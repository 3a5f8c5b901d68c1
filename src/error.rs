//! Error types for the Volume Capacity Scorer
//!
//! Scoring itself never fails. Errors only surface at the edges: loading
//! plugin configuration, adapting Kubernetes objects, and parsing the
//! candidate-node input document.

use thiserror::Error;

/// Unified error type for the scorer
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid scoring shape point {index}: {reason}")]
    InvalidShape { index: usize, reason: String },

    // =========================================================================
    // Volume Errors
    // =========================================================================
    #[error("Quantity parse error: {0}")]
    QuantityParse(String),

    #[error("Storage class not set for claim: {claim}")]
    MissingStorageClass { claim: String },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error was caused by invalid user-supplied configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::InvalidShape { .. } | Error::YamlParse(_)
        )
    }
}

/// Result type alias for the scorer
pub type Result<T> = std::result::Result<T, Error>;
