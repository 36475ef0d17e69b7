//! Reducer logic for the todo list.
//!
//! Two reducers share the action type: [`TodosReducer`] owns the list and
//! [`FilterReducer`] owns the filter. [`todo_reducer`] combines them.

use crate::types::{Todo, TodoAction, TodoId, TodoState, VisibilityFilter};
use tidy_core::{
    composition::{combine_reducers, scope_reducer, CombinedReducer},
    effect::Effect,
    reducer::Reducer,
    SmallVec,
};

/// The full todo reducer: list and filter
pub type TodoReducer = CombinedReducer<TodoState, TodoAction, ()>;

/// Builds the todo reducer
#[must_use]
pub fn todo_reducer() -> TodoReducer {
    combine_reducers(vec![
        Box::new(TodosReducer),
        Box::new(scope_reducer(FilterReducer, |state: &mut TodoState| &mut state.filter)),
    ])
}

/// Reducer for the todo list itself
///
/// Performs no validation: whatever task text arrives is appended.
#[derive(Clone, Copy, Debug, Default)]
pub struct TodosReducer;

impl TodosReducer {
    fn add(state: &mut TodoState, task: String, complete: bool) {
        let id = TodoId::new(state.next_id);
        state.next_id += 1;
        state.todos.push(Todo { id, task, complete });
        state.bump_revision();
    }

    fn update_status(state: &mut TodoState, id: TodoId, complete: bool) {
        let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) else {
            tracing::debug!(%id, "No todo with this id, nothing to update");
            return;
        };

        if todo.complete != complete {
            todo.complete = complete;
            state.bump_revision();
        }
    }

    fn clear_completed(state: &mut TodoState) {
        let before = state.todos.len();
        state.todos.retain(|todo| !todo.complete);

        if state.todos.len() != before {
            state.bump_revision();
        }
    }
}

impl Reducer for TodosReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::AddTodo { todo } => Self::add(state, todo.task, todo.complete),
            TodoAction::UpdateTodoStatus { todo, complete } => {
                Self::update_status(state, todo, complete);
            },
            TodoAction::ClearCompleted => Self::clear_completed(state),
            TodoAction::UpdateFilter { .. } | TodoAction::Unrecognized => {},
        }

        SmallVec::new()
    }
}

/// Reducer for the visibility filter
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let TodoAction::UpdateFilter { filter } = action {
            *state = filter;
        }

        SmallVec::new()
    }
}
