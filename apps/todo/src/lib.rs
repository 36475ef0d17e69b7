//! Todo list built on the Tidy state container.
//!
//! A single store holds the todos and the visibility filter. A terminal view
//! renders the store after every notification and turns typed commands into
//! actions.
//!
//! - [`types`]: state, actions and their JSON wire form
//! - [`reducer`]: how actions change the state
//! - [`selectors`]: filtered list and counts, memoized
//! - [`view`]: command parsing, gestures, rendering
//! - [`config`]: environment configuration
//!
//! # Quick Start
//!
//! ```
//! use tidy_runtime::Store;
//! use todo::{todo_reducer, visible_todos, TodoAction, TodoState, TodoView, VisibilityFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::new(TodoState::default(), todo_reducer(), ());
//! store.subscribe(|state: &TodoState| println!("{} todos", state.todos.len()));
//!
//! let mut view = TodoView::new();
//! view.update_task("buy milk");
//! view.add_todo(&mut store)?;
//! view.filter_changed(&mut store, VisibilityFilter::Active)?;
//!
//! let shown = store.state(|s| visible_todos(s).len());
//! assert_eq!(shown, 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod selectors;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::TodoError;
pub use reducer::{todo_reducer, FilterReducer, TodoReducer, TodosReducer};
pub use selectors::{stats, visible_todos, TodoSelectors, TodoStats};
pub use types::{NewTodo, Todo, TodoAction, TodoId, TodoState, VisibilityFilter};
pub use view::{render, Command, StatusChange, TodoView};
