//! Lifecycle of a component's background work.

use crate::feature::FeatureError;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Owns the tasks a component launches (event collectors and the like).
///
/// Tasks live exactly as long as the scope: cancelling or dropping it aborts
/// every task still running, which ties background work to the screen that
/// started it.
#[derive(Debug)]
pub struct ComponentScope {
    name: String,
    runtime: Handle,
    tasks: Vec<JoinHandle<()>>,
}

impl ComponentScope {
    /// A scope bound to the tokio runtime of the caller.
    pub fn new(name: impl Into<String>) -> Result<Self, FeatureError> {
        let name = name.into();
        let runtime = Handle::try_current().map_err(|_| FeatureError::NoRuntime {
            name: name.clone(),
        })?;
        Ok(Self {
            name,
            runtime,
            tasks: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `future` until it completes or the scope is cancelled.
    pub fn launch<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        let span = tracing::debug_span!("component", name = %self.name);
        self.tasks.push(self.runtime.spawn(future.instrument(span)));
    }

    /// Number of launched tasks that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(component = %self.name, tasks = self.tasks.len(), "Cancelling scope");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for ComponentScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
