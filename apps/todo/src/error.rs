//! Error types for the todo application.

use thiserror::Error;
use tidy_runtime::StoreError;

/// Errors surfaced by the todo view
#[derive(Error, Debug)]
pub enum TodoError {
    /// Tried to add a task with no visible text
    #[error("Task cannot be empty")]
    EmptyTask,

    /// A list position that is not shown in the current view
    #[error("No todo at position {position} (showing {visible})")]
    NoSuchPosition {
        /// 1-based position that was requested
        position: usize,
        /// Number of todos currently visible
        visible: usize,
    },

    /// A line of text that is not a known command
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A command was recognised but its argument was not
    #[error("Invalid argument for `{command}`: {reason}")]
    InvalidArgument {
        /// Command name
        command: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Text that is not valid JSON was dispatched as an action
    #[error("Malformed action JSON: {0}")]
    MalformedAction(#[from] serde_json::Error),

    /// The store refused the dispatch
    #[error(transparent)]
    Store(#[from] StoreError),
}
