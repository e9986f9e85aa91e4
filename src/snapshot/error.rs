//! Snapshot error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring feature state
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot format version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot was taken from a different feature
    #[error("Snapshot belongs to feature '{found}', expected '{expected}'")]
    FeatureMismatch { expected: String, found: String },
}
