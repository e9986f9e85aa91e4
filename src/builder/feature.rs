//! Builder for constructing features.

use crate::builder::error::BuildError;
use crate::core::{no_events, EventsPublisher, IntentMapper, Reducer};
use crate::effects::{Actor, EffectStream};
use crate::feature::{Feature, FeatureConfig, FeatureError, FeatureParts};
use crate::snapshot::StateSnapshot;
use std::fmt::Debug;
use std::sync::Arc;

/// Builder for constructing features with a fluent API.
///
/// Obtained from [`FeatureFactory::builder`](crate::feature::FeatureFactory::builder),
/// which supplies the runtime configuration.
pub struct FeatureBuilder<I, A, E, S, Ev> {
    name: String,
    config: FeatureConfig,
    initial_state: Option<S>,
    restored: Option<StateSnapshot<S>>,
    intent_to_action: Option<IntentMapper<I, A>>,
    reducer: Option<Reducer<S, E>>,
    actor: Option<Actor<A, S, E>>,
    events_publisher: Option<EventsPublisher<A, E, S, Ev>>,
}

impl<I, A, E, S, Ev> FeatureBuilder<I, A, E, S, Ev> {
    pub(crate) fn new(name: impl Into<String>, config: FeatureConfig) -> Self {
        Self {
            name: name.into(),
            config,
            initial_state: None,
            restored: None,
            intent_to_action: None,
            reducer: None,
            actor: None,
            events_publisher: None,
        }
    }

    /// Set the state the feature starts in (required unless restoring).
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Start from a previously captured snapshot instead of the initial
    /// state. The snapshot must have been taken from a feature with the
    /// same name.
    pub fn restore(mut self, snapshot: StateSnapshot<S>) -> Self {
        self.restored = Some(snapshot);
        self
    }

    /// Set the intent to action mapping (required).
    pub fn intent_to_action<F>(mut self, mapper: F) -> Self
    where
        F: Fn(I) -> A + Send + Sync + 'static,
    {
        self.intent_to_action = Some(Arc::new(mapper));
        self
    }

    /// Set the reducer (required).
    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&S, &E) -> S + Send + Sync + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    /// Set the actor (required).
    pub fn actor<F>(mut self, actor: F) -> Self
    where
        F: Fn(A, S) -> EffectStream<E> + Send + Sync + 'static,
    {
        self.actor = Some(Arc::new(actor));
        self
    }

    /// Set the event publisher (optional, defaults to never publishing).
    pub fn events_publisher<F>(mut self, publisher: F) -> Self
    where
        F: Fn(&A, &E, &S) -> Option<Ev> + Send + Sync + 'static,
    {
        self.events_publisher = Some(Arc::new(publisher));
        self
    }

    fn into_parts(self) -> Result<(FeatureParts<I, A, E, S, Ev>, FeatureConfig), FeatureError> {
        if self.name.trim().is_empty() {
            return Err(BuildError::EmptyName.into());
        }

        let initial_state = match self.restored {
            Some(snapshot) => snapshot.into_state_for(&self.name)?,
            None => self.initial_state.ok_or(BuildError::MissingInitialState)?,
        };
        let intent_to_action = self
            .intent_to_action
            .ok_or(BuildError::MissingIntentMapper)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;
        let actor = self.actor.ok_or(BuildError::MissingActor)?;

        let parts = FeatureParts {
            name: self.name,
            initial_state,
            intent_to_action,
            reducer,
            actor,
            events_publisher: self.events_publisher.unwrap_or_else(no_events),
        };
        Ok((parts, self.config))
    }
}

impl<A, E, S, Ev> FeatureBuilder<A, A, E, S, Ev>
where
    A: 'static,
{
    /// Hand intents to the actor unchanged.
    pub fn identity_actions(self) -> Self {
        self.intent_to_action(|intent| intent)
    }
}

impl<I, A, E, S, Ev> FeatureBuilder<I, A, E, S, Ev>
where
    I: Send + 'static,
    A: Clone + Debug + Send + 'static,
    E: Debug + Send + 'static,
    S: Clone + Send + Sync + 'static,
    Ev: Debug + Send + 'static,
{
    /// Validate the parts and start the feature on the current runtime.
    pub fn build(self) -> Result<Feature<I, A, E, S, Ev>, FeatureError> {
        let (parts, config) = self.into_parts()?;
        tracing::debug!(feature = %parts.name, "Starting feature");
        Feature::launch(parts, &config)
    }
}
