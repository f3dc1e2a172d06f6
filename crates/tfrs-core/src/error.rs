//! # Error Types
//!
//! Errors raised while loading or decoding TFRS domain data. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Editing a schedule never produces these: malformed user input is coerced
//! to an empty value and unmatched lookups resolve to empty. They surface
//! only at the edges, when reference data or fixtures are read from disk.

use thiserror::Error;

/// Top-level error type for TFRS domain data.
#[derive(Error, Debug)]
pub enum TfrsError {
    /// Reference data was structurally unusable.
    #[error("reference data error: {0}")]
    ReferenceData(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration value was missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for TfrsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for TfrsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
