//! Bounded history of applied state transitions.
//!
//! Every effect folded into a feature's state produces one
//! [`StateTransition`]. The history keeps the most recent ones so tests and
//! diagnostics can inspect the exact order in which effects were applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single reducer step.
///
/// # Example
///
/// ```rust
/// use monkeybusiness::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     sequence: 1,
///     effect: "Incremented".to_string(),
///     from: 0u32,
///     to: 1u32,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.sequence, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// Position of this step in the feature's lifetime, starting at 1
    pub sequence: u64,
    /// Debug label of the effect that was reduced
    pub effect: String,
    /// The state before the effect
    pub from: S,
    /// The state after the effect
    pub to: S,
    /// When the effect was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// Once `capacity` transitions are stored, recording a new one evicts the
/// oldest. A capacity of zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use monkeybusiness::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(2);
/// for (sequence, to) in [(1, "a"), (2, "b"), (3, "c")] {
///     history.record(StateTransition {
///         sequence,
///         effect: format!("Set({to})"),
///         from: "",
///         to,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.last().map(|t| t.to), Some("c"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S> {
    capacity: usize,
    transitions: VecDeque<StateTransition<S>>,
}

impl<S> Default for StateHistory<S> {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl<S> StateHistory<S> {
    /// Capacity used by [`StateHistory::default`].
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Create an empty history holding at most `capacity` transitions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
        }
    }

    /// Maximum number of transitions kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// The retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    /// Most recently recorded transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// The sequence of states visited, starting with the `from` state of
    /// the oldest retained transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Labels of the retained effects, oldest first.
    pub fn effects(&self) -> Vec<&str> {
        self.transitions.iter().map(|t| t.effect.as_str()).collect()
    }

    /// Time between the oldest and newest retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
