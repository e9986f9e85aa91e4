//! Constructors for the effect streams returned by actors.

use futures::channel::mpsc;
use futures::stream::{self, BoxStream, PollNext, StreamExt};
use std::future::Future;
use std::sync::Arc;

/// Stream of effects produced by one actor operation.
pub type EffectStream<E> = BoxStream<'static, E>;

/// Runs an action against a snapshot of the state and describes the
/// outcome as a stream of effects.
pub type Actor<A, S, E> = Arc<dyn Fn(A, S) -> EffectStream<E> + Send + Sync>;

/// A stream that yields exactly one effect.
pub fn just<E: Send + 'static>(effect: E) -> EffectStream<E> {
    stream::once(async move { effect }).boxed()
}

/// A stream that completes without producing anything.
pub fn none<E: Send + 'static>() -> EffectStream<E> {
    stream::empty().boxed()
}

/// A stream that yields the given effects in order.
pub fn iter<E, I>(effects: I) -> EffectStream<E>
where
    E: Send + 'static,
    I: IntoIterator<Item = E>,
    I::IntoIter: Send + 'static,
{
    stream::iter(effects).boxed()
}

/// A stream that awaits `future` and yields its output as the only effect.
pub fn from_future<E, F>(future: F) -> EffectStream<E>
where
    E: Send + 'static,
    F: Future<Output = E> + Send + 'static,
{
    stream::once(future).boxed()
}

/// Handle given to a [`flow`] body for emitting effects.
#[derive(Clone)]
pub struct Emitter<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Emitter<E> {
    /// Emit one effect. Returns `false` once nobody is listening anymore,
    /// which happens when the owning feature was disposed.
    pub fn emit(&self, effect: E) -> bool {
        self.tx.unbounded_send(effect).is_ok()
    }
}

/// Build a stream from an async body that may emit any number of effects
/// and suspend between them.
///
/// The body only runs while the stream is polled; dropping the stream
/// cancels it.
///
/// # Example
///
/// ```rust
/// use futures::StreamExt;
/// use monkeybusiness::effects::flow;
///
/// # tokio_test_block(async {
/// let effects: Vec<u32> = flow(|emitter| async move {
///     emitter.emit(1);
///     tokio::task::yield_now().await;
///     emitter.emit(2);
/// })
/// .collect()
/// .await;
/// assert_eq!(effects, vec![1, 2]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub fn flow<E, F, Fut>(body: F) -> EffectStream<E>
where
    E: Send + 'static,
    F: FnOnce(Emitter<E>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded();
    let producer = body(Emitter { tx });
    // The body's own output carries no effect; it only needs to be driven.
    // Driving it first means anything it emits without suspending is already
    // queued when the channel is read.
    let driver = stream::once(producer).filter_map(|()| async { None });
    stream::select_with_strategy(driver, rx, |_: &mut ()| PollNext::Left).boxed()
}
