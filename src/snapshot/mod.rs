//! Saving and restoring feature state.
//!
//! A screen can be torn down by the platform at any moment (process death,
//! configuration change). A [`StateSnapshot`] captures a feature's state so
//! the screen can be rebuilt exactly where the user left it. Only state is
//! captured; reducers, actors and in-flight work are not serializable.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of a feature's state at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot<S> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// Name of the feature the state belongs to
    pub feature: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// The captured state
    pub state: S,
}

impl<S> StateSnapshot<S> {
    pub fn new(feature: impl Into<String>, state: S) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            feature: feature.into(),
            taken_at: Utc::now(),
            state,
        }
    }

    /// Check that this snapshot can seed the feature called `feature`.
    pub fn validate_for(&self, feature: &str) -> Result<(), SnapshotError> {
        self.validate_version()?;
        if self.feature != feature {
            return Err(SnapshotError::FeatureMismatch {
                expected: feature.to_string(),
                found: self.feature.clone(),
            });
        }
        Ok(())
    }

    /// Validate and unwrap the captured state.
    pub fn into_state_for(self, feature: &str) -> Result<S, SnapshotError> {
        self.validate_for(feature)?;
        Ok(self.state)
    }

    fn validate_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

impl<S: Serialize> StateSnapshot<S> {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Compact binary form, suitable for platform state bundles.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }
}

impl<S: DeserializeOwned> StateSnapshot<S> {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate_version()?;
        Ok(snapshot)
    }
}
