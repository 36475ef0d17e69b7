//! # Tidy Runtime
//!
//! Runtime implementation for the Tidy state container.
//!
//! This crate provides the Store runtime that coordinates reducer execution,
//! effect handling, and subscriber notification.
//!
//! ## Core Components
//!
//! - **Store**: Sole owner of state; applies actions through the reducer
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//! - **Subscribers**: Observer list notified synchronously after every reduction
//!
//! ## Dispatch Model
//!
//! Everything is synchronous and single-owner. `send` takes `&mut self`, so
//! dispatches are serialised by construction and a subscriber cannot
//! re-enter the store while it is being notified.
//!
//! ## Example
//!
//! ```ignore
//! use tidy_runtime::Store;
//!
//! let mut store = Store::new(TodoState::default(), todo_reducer(), ());
//!
//! store.subscribe(|state: &TodoState| println!("{} todos", state.todos.len()));
//!
//! // Send an action; subscribers have run by the time this returns
//! store.send(TodoAction::add("buy milk"))?;
//!
//! // Read state
//! let count = store.state(|s| s.todos.len());
//! ```

use std::time::Instant;
use tidy_core::{action::Action, effect::Effect, reducer::Reducer};

/// Metric descriptions and the Prometheus exporter
pub mod metrics;

/// Observer list used by the Store
pub mod subscription;

pub use subscription::{SubscriptionId, Subscribers};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured depth
        ///
        /// The reduction that tripped the limit is not applied. Reductions
        /// that ran before it, and their notifications, stand.
        #[error("Effect feedback exceeded the maximum depth of {0} nested dispatches")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Store configuration
///
/// # Example
///
/// ```
/// use tidy_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_depth(8);
/// assert_eq!(config.max_feedback_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many levels of `Effect::Dispatch` feedback a single `send` may nest
    pub max_feedback_depth: usize,
}

impl StoreConfig {
    /// Default nesting limit for effect feedback
    pub const DEFAULT_MAX_FEEDBACK_DEPTH: usize = 32;

    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_depth: usize) -> Self {
        Self { max_feedback_depth }
    }

    /// Set the feedback depth limit
    #[must_use]
    pub const fn with_max_feedback_depth(mut self, depth: usize) -> Self {
        self.max_feedback_depth = depth;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FEEDBACK_DEPTH)
    }
}

/// Anything that accepts actions
///
/// Views depend on this rather than on a concrete [`Store`], so they can be
/// exercised against a recording dispatcher in tests.
pub trait Dispatch<A> {
    /// Dispatch `action`
    ///
    /// # Errors
    ///
    /// Implementation-defined; for [`Store`] see [`Store::send`].
    fn dispatch(&mut self, action: A) -> Result<(), StoreError>;
}

/// The Store - sole owner of application state
///
/// The Store manages:
/// 1. State (owned directly; no interior mutability)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
/// 5. Subscribers (notified after every reduction)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    subscribers: Subscribers<S>,
    config: StoreConfig,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Action,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses [`StoreConfig::default`].
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            subscribers: Subscribers::new(),
            config,
        }
    }

    /// Send an action to the store
    ///
    /// This is the single entry point for state changes:
    /// 1. Calls reducer with (state, action, environment)
    /// 2. Notifies every subscriber, whether or not the state changed
    /// 3. Executes returned effects in order; each `Effect::Dispatch` is a
    ///    nested send with its own notification
    ///
    /// Everything above has happened by the time `send` returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] if effects nest dispatches
    /// deeper than [`StoreConfig::max_feedback_depth`]. Remaining effects are
    /// abandoned.
    #[tracing::instrument(skip(self, action), fields(action = action.action_type()), name = "store_send")]
    pub fn send(&mut self, action: A) -> Result<(), StoreError> {
        self.dispatch_at_depth(action, 0)
    }

    fn dispatch_at_depth(&mut self, action: A, depth: usize) -> Result<(), StoreError> {
        if depth > self.config.max_feedback_depth {
            tracing::warn!(
                action = action.action_type(),
                max_depth = self.config.max_feedback_depth,
                "Effect feedback limit exceeded, dropping action"
            );
            ::metrics::counter!("store_feedback_limit_exceeded_total").increment(1);
            return Err(StoreError::FeedbackLimitExceeded(self.config.max_feedback_depth));
        }

        let action_type = action.action_type();
        let started = Instant::now();
        let effects = self.reducer.reduce(&mut self.state, action, &self.environment);

        ::metrics::histogram!("store_reduce_duration_seconds").record(started.elapsed().as_secs_f64());
        ::metrics::counter!("store_actions_dispatched_total", "action" => action_type).increment(1);
        tracing::debug!(
            action = action_type,
            depth,
            effects = effects.len(),
            subscribers = self.subscribers.len(),
            "Action reduced"
        );

        self.subscribers.notify(&self.state);

        for effect in effects {
            self.execute(effect, depth)?;
        }

        Ok(())
    }

    fn execute(&mut self, effect: Effect<A>, depth: usize) -> Result<(), StoreError> {
        match effect {
            Effect::None => Ok(()),
            Effect::Sequential(effects) => {
                for effect in effects {
                    self.execute(effect, depth)?;
                }
                Ok(())
            },
            Effect::Dispatch(action) => self.dispatch_at_depth(*action, depth + 1),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Read current state via a closure
    ///
    /// ```ignore
    /// let remaining = store.state(|s| s.todos.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// Borrow the current state
    #[must_use]
    pub const fn snapshot(&self) -> &S {
        &self.state
    }

    /// Consume the store, returning its final state
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }

    /// The injected environment
    #[must_use]
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Register a callback invoked after every reduction
    ///
    /// The callback receives the state as it stands after the reduction.
    /// Callbacks run synchronously, in registration order.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        let id = self.subscribers.subscribe(callback);
        tracing::debug!(subscription = %id, "Subscriber registered");
        id
    }

    /// Remove a previously registered callback
    ///
    /// Returns false if `id` is unknown (already removed).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.unsubscribe(id);
        tracing::debug!(subscription = %id, removed, "Subscriber removed");
        removed
    }

    /// Number of registered subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<S, A, E, R> Dispatch<A> for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Action,
{
    fn dispatch(&mut self, action: A) -> Result<(), StoreError> {
        self.send(action)
    }
}

impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tidy_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct CounterState {
        count: i64,
    }

    #[derive(Debug, Clone)]
    enum CounterAction {
        Increment,
        IncrementTwiceLater,
        Loop,
        Ignored,
    }

    impl Action for CounterAction {
        fn action_type(&self) -> &'static str {
            match self {
                Self::Increment => "INCREMENT",
                Self::IncrementTwiceLater => "INCREMENT_TWICE_LATER",
                Self::Loop => "LOOP",
                Self::Ignored => "IGNORED",
            }
        }
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                CounterAction::IncrementTwiceLater => smallvec![Effect::chain(vec![
                    Effect::dispatch(CounterAction::Increment),
                    Effect::None,
                    Effect::dispatch(CounterAction::Increment),
                ])],
                CounterAction::Loop => {
                    state.count += 1;
                    smallvec![Effect::dispatch(CounterAction::Loop)]
                },
                CounterAction::Ignored => SmallVec::new(),
            }
        }
    }

    fn counting_store() -> (Store<CounterState, CounterAction, (), CounterReducer>, Arc<AtomicUsize>) {
        let mut store = Store::new(CounterState::default(), CounterReducer, ());
        let notifications = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notifications);
        store.subscribe(move |_: &CounterState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (store, notifications)
    }

    #[test]
    fn test_send_reduces_and_notifies() {
        let (mut store, notifications) = counting_store();

        assert_eq!(store.send(CounterAction::Increment), Ok(()));

        assert_eq!(store.state(|s| s.count), 1);
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unchanged_state_still_notifies() {
        let (mut store, notifications) = counting_store();

        assert_eq!(store.send(CounterAction::Ignored), Ok(()));

        assert_eq!(store.snapshot(), &CounterState::default());
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_effects_feed_back() {
        let (mut store, notifications) = counting_store();

        assert_eq!(store.send(CounterAction::IncrementTwiceLater), Ok(()));

        assert_eq!(store.state(|s| s.count), 2);
        // One for the original action, one per fed-back action
        assert_eq!(notifications.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_feedback_limit() {
        let mut store = Store::with_config(
            CounterState::default(),
            CounterReducer,
            (),
            StoreConfig::default().with_max_feedback_depth(3),
        );

        let result = store.send(CounterAction::Loop);

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded(3)));
        // Depths 0..=3 were applied before the limit tripped
        assert_eq!(store.state(|s| s.count), 4);
    }

    #[test]
    fn test_dispatch_trait_delegates_to_send() {
        fn drive<D: Dispatch<CounterAction>>(target: &mut D) -> Result<(), StoreError> {
            target.dispatch(CounterAction::Increment)?;
            target.dispatch(CounterAction::Increment)
        }

        let (mut store, notifications) = counting_store();
        assert_eq!(drive(&mut store), Ok(()));
        assert_eq!(store.into_state().count, 2);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = Store::new(CounterState::default(), CounterReducer, ());
        let notifications = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notifications);
        let id = store.subscribe(move |_: &CounterState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let _ = store.send(CounterAction::Increment);
        assert!(store.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);
        let _ = store.send(CounterAction::Increment);

        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        assert_eq!(store.state(|s| s.count), 2);
    }
}
