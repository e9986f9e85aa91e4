//! Build errors for the feature builder.

use thiserror::Error;

/// Errors that can occur when assembling a feature.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Feature name is empty. Every feature needs a name for logging")]
    EmptyName,

    #[error("Initial state not specified. Call .initial_state(state) or .restore(snapshot) before .build()")]
    MissingInitialState,

    #[error("Intent mapping not specified. Call .intent_to_action(f) or .identity_actions()")]
    MissingIntentMapper,

    #[error("Reducer not specified. Call .reducer(f)")]
    MissingReducer,

    #[error("Actor not specified. Call .actor(f)")]
    MissingActor,
}
