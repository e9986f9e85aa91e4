//! Errors raised while creating a feature.

use crate::builder::BuildError;
use crate::snapshot::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Feature '{name}' must be created from within a tokio runtime")]
    NoRuntime { name: String },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Cannot restore feature: {0}")]
    Snapshot(#[from] SnapshotError),
}
