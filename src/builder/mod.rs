//! Builder API for ergonomic feature construction.
//!
//! [`FeatureBuilder`] assembles a feature piece by piece and reports every
//! missing piece as a [`BuildError`] instead of panicking.

pub mod error;
pub mod feature;

pub use error::BuildError;
pub use feature::FeatureBuilder;
