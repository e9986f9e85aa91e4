//! Pure core of a feature.
//!
//! This module contains the parts of a feature that have no side effects:
//! - Type aliases for intent mapping, reduction and event publishing
//! - A pure fold over effects, the synchronous model of the feature loop
//! - Bounded history of applied transitions

mod history;
mod reducer;

pub use history::{StateHistory, StateTransition};
pub use reducer::{fold_effects, no_events, EventsPublisher, IntentMapper, Reducer};
