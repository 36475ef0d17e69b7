//! Domain types for the todo list.
//!
//! The state is a list of todos in insertion order plus the visibility filter
//! the view applies to it. Actions mirror the JSON objects a view sends to the
//! store, tagged by a `type` field (`ADD_TODO`, `UPDATE_TODO_STATUS`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tidy_macros::{Action, State};

/// Stable identifier of a todo, unique within one store
///
/// Assigned by the reducer when a todo is added; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier assigned on creation
    pub id: TodoId,
    /// What needs doing
    pub task: String,
    /// Whether it is done
    pub complete: bool,
}

/// Payload of `ADD_TODO`: a todo that has no id yet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// What needs doing
    pub task: String,
    /// Whether it starts out done; views always send `false`
    #[serde(default)]
    pub complete: bool,
}

impl NewTodo {
    /// An incomplete todo
    #[must_use]
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            complete: false,
        }
    }
}

/// Which todos the view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    All,
    /// Only todos that are not complete
    Active,
    /// Only completed todos
    Completed,
}

impl VisibilityFilter {
    /// Every filter, in the order the view lists them
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Display name, identical to the serialized form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Returns true if `todo` passes this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.complete,
            Self::Completed => todo.complete,
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text names no filter
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown visibility filter `{0}` (expected All, Active or Completed)")]
pub struct ParseFilterError(String);

impl FromStr for VisibilityFilter {
    type Err = ParseFilterError;

    /// Case-insensitive: `active`, `Active` and `ACTIVE` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseFilterError(trimmed.to_string()))
    }
}

/// State of the todo list
#[derive(State, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// Todos in insertion order
    ///
    /// Change only through the reducer: it bumps `revision`, which
    /// [`TodoSelectors`](crate::selectors::TodoSelectors) uses as its cache key.
    pub todos: Vec<Todo>,
    /// Active visibility filter
    pub filter: VisibilityFilter,
    /// Id given to the next todo added
    pub next_id: u64,
    /// Incremented every time `todos` changes
    #[revision]
    pub revision: u64,
}

impl TodoState {
    /// Creates an empty list showing `filter`
    #[must_use]
    pub const fn with_filter(filter: VisibilityFilter) -> Self {
        Self {
            todos: Vec::new(),
            filter,
            next_id: 0,
            revision: 0,
        }
    }

    /// Returns a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }
}

/// Everything that can be sent to the todo store
///
/// Serialized as an object tagged by `type`:
///
/// ```json
/// {"type": "ADD_TODO", "todo": {"task": "buy milk", "complete": false}}
/// {"type": "UPDATE_TODO_STATUS", "todo": 0, "complete": true}
/// {"type": "UPDATE_FILTER", "filter": "Active"}
/// {"type": "CLEAR_COMPLETED"}
/// ```
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a todo to the end of the list
    AddTodo {
        /// The todo to add
        todo: NewTodo,
    },

    /// Set the completion flag of one todo
    UpdateTodoStatus {
        /// Which todo
        todo: TodoId,
        /// New completion flag
        complete: bool,
    },

    /// Change the visibility filter
    UpdateFilter {
        /// New filter
        filter: VisibilityFilter,
    },

    /// Remove every completed todo
    ClearCompleted,

    /// Any action this store does not understand; reduces to nothing
    #[serde(other)]
    Unrecognized,
}

impl TodoAction {
    /// `ADD_TODO` for an incomplete todo with the given text
    #[must_use]
    pub fn add(task: impl Into<String>) -> Self {
        Self::AddTodo {
            todo: NewTodo::new(task),
        }
    }

    /// Decode an action from its JSON wire form
    ///
    /// Anything that is a JSON object but not a known action (unknown `type`,
    /// missing fields, an invalid filter name) decodes to
    /// [`TodoAction::Unrecognized`], which the reducer ignores.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is not valid JSON.
    pub fn from_wire(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        Ok(Self::deserialize(value).unwrap_or_else(|error| {
            tracing::warn!(%error, "Unrecognized action");
            Self::Unrecognized
        }))
    }
}
