//! The effectful half of a feature.
//!
//! An actor receives an action plus a snapshot of the state and answers
//! with a stream of effects. Actors may suspend (repository calls, timers)
//! but never touch state directly; the feature loop folds whatever they
//! emit through the reducer.
//!
//! Failures inside an actor are expected to be caught and turned into
//! effects that carry a `Result`, so the reducer can surface them as UI
//! error state.

mod stream;

pub use stream::{flow, from_future, iter, just, none, Actor, EffectStream, Emitter};
