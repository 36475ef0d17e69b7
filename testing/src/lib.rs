//! # Tidy Testing
//!
//! Testing utilities and helpers for the Tidy state container.
//!
//! This crate provides:
//! - `ReducerTest`: Given-When-Then harness for reducers
//! - Effect assertion helpers
//! - `NotificationProbe`: a subscriber that records every state it is shown
//! - `RecordingDispatcher`: a `Dispatch` implementation that just records actions
//!
//! ## Example
//!
//! ```ignore
//! use tidy_testing::NotificationProbe;
//! use tidy_runtime::Store;
//!
//! #[test]
//! fn test_add_notifies() {
//!     let mut store = Store::new(TodoState::default(), todo_reducer(), ());
//!     let probe = NotificationProbe::attach(&mut store);
//!
//!     store.send(TodoAction::add("buy milk")).unwrap();
//!
//!     assert_eq!(probe.count(), 1);
//!     assert_eq!(probe.last().unwrap().todos.len(), 1);
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use tidy_core::{action::Action, reducer::Reducer};
use tidy_runtime::{Dispatch, Store, StoreError, SubscriptionId};


pub use reducer_test::{assertions, ReducerTest};

/// Subscriber that records a clone of the state on every notification
///
/// Cheap to clone; all clones share the same recording.
#[derive(Debug)]
pub struct NotificationProbe<S> {
    snapshots: Arc<Mutex<Vec<S>>>,
    id: SubscriptionId,
}

impl<S> Clone for NotificationProbe<S> {
    fn clone(&self) -> Self {
        Self {
            snapshots: Arc::clone(&self.snapshots),
            id: self.id,
        }
    }
}

impl<S> NotificationProbe<S>
where
    S: Clone + Send + 'static,
{
    /// Subscribe a new probe to `store`
    pub fn attach<A, E, R>(store: &mut Store<S, A, E, R>) -> Self
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&snapshots);

        let id = store.subscribe(move |state: &S| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(state.clone());
        });

        Self { snapshots, id }
    }

    /// The subscription backing this probe
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Number of notifications received
    #[must_use]
    pub fn count(&self) -> usize {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every state seen, oldest first
    #[must_use]
    pub fn snapshots(&self) -> Vec<S> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent state seen
    #[must_use]
    pub fn last(&self) -> Option<S> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

/// A [`Dispatch`] target that records actions instead of reducing them
#[derive(Debug, Clone)]
pub struct RecordingDispatcher<A> {
    actions: Vec<A>,
}

impl<A> RecordingDispatcher<A> {
    /// Create an empty recorder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Actions dispatched so far, in order
    #[must_use]
    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Wire type names of the dispatched actions, in order
    #[must_use]
    pub fn action_types(&self) -> Vec<&'static str>
    where
        A: Action,
    {
        self.actions.iter().map(Action::action_type).collect()
    }
}

impl<A> Default for RecordingDispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Dispatch<A> for RecordingDispatcher<A> {
    fn dispatch(&mut self, action: A) -> Result<(), StoreError> {
        self.actions.push(action);
        Ok(())
    }
}

/// Install a test-friendly tracing subscriber (`RUST_LOG` aware)
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Ping,
    }

    impl Action for Ping {
        fn action_type(&self) -> &'static str {
            "PING"
        }
    }

    #[test]
    fn test_recording_dispatcher() {
        let mut recorder = RecordingDispatcher::new();
        assert_eq!(recorder.dispatch(Ping::Ping), Ok(()));
        assert_eq!(recorder.dispatch(Ping::Ping), Ok(()));

        assert_eq!(recorder.actions(), &[Ping::Ping, Ping::Ping]);
        assert_eq!(recorder.action_types(), vec!["PING", "PING"]);
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
