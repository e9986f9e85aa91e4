//! The MVI feature runtime.
//!
//! A [`Feature`] turns intents into state:
//!
//! ```text
//! accept(intent) ─► intent_to_action ─► actor(action, state) ─► effects
//!                                                                  │
//!        state stream ◄── reducer(state, effect) ◄─────────────────┘
//!                              │
//!                              └─► events_publisher ─► one-shot events
//! ```
//!
//! Features are created through a [`FeatureFactory`], either all at once
//! with [`FeatureFactory::create`] or fluently with
//! [`FeatureFactory::builder`].

mod config;
mod error;
mod factory;
mod machine;

pub use config::{ConfigError, FeatureConfig};
pub use error::FeatureError;
pub use factory::FeatureFactory;
pub use machine::{EventReceiver, Feature};

pub(crate) use machine::FeatureParts;
