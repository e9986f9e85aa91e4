//! The feature loop: intents in, effects folded into state, events out.

use crate::core::{EventsPublisher, IntentMapper, Reducer, StateHistory, StateTransition};
use crate::effects::{Actor, EffectStream};
use crate::feature::{FeatureConfig, FeatureError};
use crate::snapshot::StateSnapshot;
use chrono::Utc;
use futures::stream::{BoxStream, SelectAll};
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Receiving end of a feature's one-shot events.
pub type EventReceiver<Ev> = mpsc::Receiver<Ev>;

/// Everything a feature is made of, assembled by the builder.
pub(crate) struct FeatureParts<I, A, E, S, Ev> {
    pub name: String,
    pub initial_state: S,
    pub intent_to_action: IntentMapper<I, A>,
    pub reducer: Reducer<S, E>,
    pub actor: Actor<A, S, E>,
    pub events_publisher: EventsPublisher<A, E, S, Ev>,
}

/// A running MVI state machine.
///
/// The feature owns a single task that serializes every state change:
/// intents are mapped to actions, actions are run by the actor, and the
/// effects the actor emits are folded into the state one at a time, in the
/// order they arrive. Actor operations run concurrently with each other but
/// never touch state themselves.
///
/// Dropping the feature cancels the loop together with all in-flight actor
/// work.
pub struct Feature<I, A, E, S, Ev> {
    name: Arc<str>,
    intents: mpsc::UnboundedSender<I>,
    state: watch::Receiver<S>,
    events: Option<EventReceiver<Ev>>,
    history: Arc<Mutex<StateHistory<S>>>,
    task: JoinHandle<()>,
    disposed: AtomicBool,
    _types: PhantomData<fn() -> (A, E)>,
}

impl<I, A, E, S, Ev> Feature<I, A, E, S, Ev>
where
    I: Send + 'static,
    A: Clone + Debug + Send + 'static,
    E: Debug + Send + 'static,
    S: Clone + Send + Sync + 'static,
    Ev: Debug + Send + 'static,
{
    pub(crate) fn launch(
        parts: FeatureParts<I, A, E, S, Ev>,
        config: &FeatureConfig,
    ) -> Result<Self, FeatureError> {
        let runtime = Handle::try_current().map_err(|_| FeatureError::NoRuntime {
            name: parts.name.clone(),
        })?;

        let name: Arc<str> = Arc::from(parts.name);
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(parts.initial_state);
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));
        let history = Arc::new(Mutex::new(StateHistory::with_capacity(
            config.history_capacity,
        )));

        let feature_loop = FeatureLoop {
            intent_to_action: parts.intent_to_action,
            reducer: parts.reducer,
            actor: parts.actor,
            events_publisher: parts.events_publisher,
            state: state_tx,
            events: event_tx,
            history: Arc::clone(&history),
            sequence: 0,
        };

        let span = tracing::info_span!("feature", name = %name);
        let task = runtime.spawn(feature_loop.run(intent_rx).instrument(span));

        Ok(Self {
            name,
            intents: intent_tx,
            state: state_rx,
            events: Some(event_rx),
            history,
            task,
            disposed: AtomicBool::new(false),
            _types: PhantomData,
        })
    }
}

impl<I, A, E, S, Ev> Feature<I, A, E, S, Ev> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit an intent. Never blocks; ignored once the feature is disposed.
    pub fn accept(&self, intent: I) {
        if self.is_disposed() || self.intents.send(intent).is_err() {
            tracing::debug!(feature = %self.name, "Feature is disposed, ignoring intent");
        }
    }

    /// A new observer of the state stream, positioned at the current state.
    pub fn state(&self) -> watch::Receiver<S> {
        self.state.clone()
    }

    /// Take the event stream. There is a single subscriber per feature, so
    /// this returns `None` after the first call.
    pub fn take_events(&mut self) -> Option<EventReceiver<Ev>> {
        self.events.take()
    }

    /// Stop the loop and cancel all in-flight actor work. The last state
    /// stays observable.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        self.task.abort();
    }

    /// True as soon as [`Feature::dispose`] was called, even though the
    /// loop task winds down asynchronously.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire) || self.task.is_finished()
    }
}

impl<I, A, E, S: Clone, Ev> Feature<I, A, E, S, Ev> {
    pub fn current_state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Copy of the transitions applied so far, bounded by the configured
    /// history capacity.
    pub fn history(&self) -> StateHistory<S> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Capture the current state so the feature can be rebuilt later.
    pub fn snapshot(&self) -> StateSnapshot<S> {
        StateSnapshot::new(self.name.as_ref(), self.current_state())
    }
}

impl<I, A, E, S, Ev> Drop for Feature<I, A, E, S, Ev> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type Outcome<A, E> = (A, Result<E, Box<dyn Any + Send>>);
type Operation<A, E> = BoxStream<'static, Outcome<A, E>>;

struct FeatureLoop<I, A, E, S, Ev> {
    intent_to_action: IntentMapper<I, A>,
    reducer: Reducer<S, E>,
    actor: Actor<A, S, E>,
    events_publisher: EventsPublisher<A, E, S, Ev>,
    state: watch::Sender<S>,
    events: mpsc::Sender<Ev>,
    history: Arc<Mutex<StateHistory<S>>>,
    sequence: u64,
}

impl<I, A, E, S, Ev> FeatureLoop<I, A, E, S, Ev>
where
    I: Send + 'static,
    A: Clone + Debug + Send + 'static,
    E: Debug + Send + 'static,
    S: Clone + Send + Sync + 'static,
    Ev: Debug + Send + 'static,
{
    async fn run(mut self, mut intents: mpsc::UnboundedReceiver<I>) {
        tracing::debug!("Feature started");
        let mut in_flight: SelectAll<Operation<A, E>> = SelectAll::new();

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.handle_intent(intent, &mut in_flight),
                    None => break,
                },
                Some((action, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    self.handle_outcome(&action, outcome);
                }
            }
        }

        tracing::debug!("Feature stopped");
    }

    fn handle_intent(&mut self, intent: I, in_flight: &mut SelectAll<Operation<A, E>>) {
        let action = (self.intent_to_action)(intent);
        tracing::debug!(?action, "Accepted intent");

        let snapshot = self.state.borrow().clone();
        let effects = match std::panic::catch_unwind(AssertUnwindSafe(|| {
            (self.actor)(action.clone(), snapshot)
        })) {
            Ok(effects) => effects,
            Err(panic) => {
                tracing::error!(?action, reason = panic_message(&*panic), "Actor panicked");
                return;
            }
        };

        let mut operation = guard_operation(action, effects);

        // Apply whatever is ready right away so that synchronous intents keep
        // their submission order.
        loop {
            match operation.next().now_or_never() {
                Some(Some((action, outcome))) => self.handle_outcome(&action, outcome),
                Some(None) => return,
                None => break,
            }
        }
        in_flight.push(operation);
    }

    fn handle_outcome(&mut self, action: &A, outcome: Result<E, Box<dyn Any + Send>>) {
        match outcome {
            Ok(effect) => self.apply(action, effect),
            Err(panic) => {
                tracing::error!(
                    ?action,
                    reason = panic_message(&*panic),
                    "Actor operation panicked"
                );
            }
        }
    }

    fn apply(&mut self, action: &A, effect: E) {
        let (previous, next) = {
            let current = self.state.borrow();
            let next = (self.reducer)(&current, &effect);
            (current.clone(), next)
        };

        self.sequence += 1;
        tracing::trace!(sequence = self.sequence, ?effect, "Applied effect");

        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.capacity() > 0 {
                history.record(StateTransition {
                    sequence: self.sequence,
                    effect: format!("{effect:?}"),
                    from: previous,
                    to: next.clone(),
                    timestamp: Utc::now(),
                });
            }
        }

        let event = (self.events_publisher)(action, &effect, &next);
        self.state.send_replace(next);

        if let Some(event) = event {
            self.publish(event);
        }
    }

    fn publish(&self, event: Ev) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "Event buffer is full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!(?event, "Event subscriber is gone, dropping event");
            }
        }
    }
}

/// Tag every effect with its action and stop the operation, rather than the
/// loop, if the actor panics while producing effects.
fn guard_operation<A, E>(action: A, effects: EffectStream<E>) -> Operation<A, E>
where
    A: Clone + Send + 'static,
    E: Send + 'static,
{
    AssertUnwindSafe(effects)
        .catch_unwind()
        .map(move |outcome| (action.clone(), outcome))
        .boxed()
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
