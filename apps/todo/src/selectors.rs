//! Derived views over [`TodoState`].
//!
//! The free functions compute from scratch. [`TodoSelectors`] memoizes them
//! on the state's revision (and filter), so re-rendering an unchanged list
//! does no work.

use crate::types::{Todo, TodoState, VisibilityFilter};
use tidy_core::selector::Memo;

/// Completed/active counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoStats {
    /// Todos marked complete
    pub completed: usize,
    /// Todos not yet complete
    pub active: usize,
}

impl TodoStats {
    /// All todos
    #[must_use]
    pub const fn total(&self) -> usize {
        self.completed + self.active
    }
}

/// Todos that pass the state's filter, in list order
#[must_use]
pub fn visible_todos(state: &TodoState) -> Vec<&Todo> {
    state
        .todos
        .iter()
        .filter(|todo| state.filter.matches(todo))
        .collect()
}

/// Completed and active counts over the whole list, ignoring the filter
#[must_use]
pub fn stats(state: &TodoState) -> TodoStats {
    let completed = state.todos.iter().filter(|todo| todo.complete).count();

    TodoStats {
        completed,
        active: state.todos.len() - completed,
    }
}

/// Memoized selectors for one store's state
///
/// Keys are revisions, which are only meaningful within a single store:
/// keep one `TodoSelectors` per store.
///
/// Only the reducer bumps the revision. A state whose `todos` were edited
/// directly keeps its old revision and is served the cached result, so
/// states passed here must be changed only through the reducer.
#[derive(Debug, Default)]
pub struct TodoSelectors {
    visible: Memo<(u64, VisibilityFilter), Vec<Todo>>,
    stats: Memo<u64, TodoStats>,
}

impl TodoSelectors {
    /// Create empty caches
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible: Memo::new(),
            stats: Memo::new(),
        }
    }

    /// Memoized [`visible_todos`]
    pub fn visible_todos(&mut self, state: &TodoState) -> &[Todo] {
        self.visible
            .get_or_compute((state.revision(), state.filter), || {
                visible_todos(state).into_iter().cloned().collect()
            })
    }

    /// Memoized [`stats`]
    pub fn stats(&mut self, state: &TodoState) -> TodoStats {
        *self.stats.get_or_compute(state.revision(), || stats(state))
    }

    /// How many times each selector recomputed, as `(visible, stats)`
    #[must_use]
    pub const fn recomputations(&self) -> (u64, u64) {
        (self.visible.misses(), self.stats.misses())
    }
}
