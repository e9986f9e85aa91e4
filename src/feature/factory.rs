//! Entry point for creating features.

use crate::builder::FeatureBuilder;
use crate::effects::EffectStream;
use crate::feature::{Feature, FeatureConfig, FeatureError};
use std::fmt::Debug;

/// Creates [`Feature`]s sharing one [`FeatureConfig`].
///
/// Components take a factory as a dependency so tests and hosts can tune
/// the loop (history size, event buffering) in one place.
///
/// # Example
///
/// ```rust
/// use monkeybusiness::effects;
/// use monkeybusiness::feature::FeatureFactory;
///
/// #[derive(Clone, Debug)]
/// enum Intent {
///     Increment,
/// }
///
/// #[derive(Debug)]
/// enum Effect {
///     Incremented,
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let feature = FeatureFactory::new()
///     .create(
///         "Counter",
///         0u32,
///         |intent: Intent| intent,
///         |count: &u32, effect: &Effect| match effect {
///             Effect::Incremented => count + 1,
///         },
///         |action: Intent, _state: u32| match action {
///             Intent::Increment => effects::just(Effect::Incremented),
///         },
///         |_: &Intent, _: &Effect, _: &u32| None::<()>,
///     )
///     .unwrap();
///
/// feature.accept(Intent::Increment);
/// let mut state = feature.state();
/// let count = *state.wait_for(|count| *count == 1).await.unwrap();
/// assert_eq!(count, 1);
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct FeatureFactory {
    config: FeatureConfig,
}

impl FeatureFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Start a fluent builder for a feature called `name`.
    pub fn builder<I, A, E, S, Ev>(&self, name: impl Into<String>) -> FeatureBuilder<I, A, E, S, Ev> {
        FeatureBuilder::new(name, self.config.clone())
    }

    /// Create and start a feature from all of its parts at once.
    #[allow(clippy::too_many_arguments)]
    pub fn create<I, A, E, S, Ev, M, R, F, P>(
        &self,
        name: impl Into<String>,
        initial_state: S,
        intent_to_action: M,
        reducer: R,
        actor: F,
        events_publisher: P,
    ) -> Result<Feature<I, A, E, S, Ev>, FeatureError>
    where
        I: Send + 'static,
        A: Clone + Debug + Send + 'static,
        E: Debug + Send + 'static,
        S: Clone + Send + Sync + 'static,
        Ev: Debug + Send + 'static,
        M: Fn(I) -> A + Send + Sync + 'static,
        R: Fn(&S, &E) -> S + Send + Sync + 'static,
        F: Fn(A, S) -> EffectStream<E> + Send + Sync + 'static,
        P: Fn(&A, &E, &S) -> Option<Ev> + Send + Sync + 'static,
    {
        self.builder(name)
            .initial_state(initial_state)
            .intent_to_action(intent_to_action)
            .reducer(reducer)
            .actor(actor)
            .events_publisher(events_publisher)
            .build()
    }
}
