//! Pure functions that make up a feature: intent mapping, reduction and
//! event publishing.

use std::sync::Arc;

/// Converts a user intent into the action handed to the actor.
pub type IntentMapper<I, A> = Arc<dyn Fn(I) -> A + Send + Sync>;

/// Folds one effect into the previous state, producing the next state.
///
/// Reducers must be pure: the result depends only on the two arguments.
pub type Reducer<S, E> = Arc<dyn Fn(&S, &E) -> S + Send + Sync>;

/// Decides whether applying `effect` for `action` should also emit a
/// one-shot event. Receives the state after the effect was reduced.
pub type EventsPublisher<A, E, S, Ev> = Arc<dyn Fn(&A, &E, &S) -> Option<Ev> + Send + Sync>;

/// Publisher that never emits anything.
pub fn no_events<A, E, S, Ev>() -> EventsPublisher<A, E, S, Ev> {
    Arc::new(|_, _, _| None)
}

/// Apply a sequence of effects to `initial` in order.
///
/// This is exactly what a feature's loop does, minus the asynchrony, which
/// makes it handy for testing reducers in isolation.
///
/// # Example
///
/// ```rust
/// use monkeybusiness::core::fold_effects;
///
/// let total = fold_effects(|sum: &i32, n: &i32| sum + n, 0, &[1, 2, 3]);
/// assert_eq!(total, 6);
/// ```
pub fn fold_effects<'a, S, E, F>(
    reduce: F,
    initial: S,
    effects: impl IntoIterator<Item = &'a E>,
) -> S
where
    E: 'a,
    F: Fn(&S, &E) -> S,
{
    effects
        .into_iter()
        .fold(initial, |state, effect| reduce(&state, effect))
}
