//! Terminal view for the todo list.
//!
//! [`TodoView`] turns user gestures into actions on anything that implements
//! [`Dispatch`]. Its only state is the text of the task being typed; the
//! list, the filter and the counts always come from the store. [`render`]
//! draws a full snapshot and is called after every store notification.

use crate::error::TodoError;
use crate::selectors::{visible_todos, TodoSelectors};
use crate::types::{ParseFilterError, TodoAction, TodoId, TodoState, VisibilityFilter};
use std::fmt::Write as _;
use tidy_runtime::Dispatch;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  task <text>        type a task (replaces the input)
  add [text]         add the typed task, or <text>
  <enter>            add the typed task
  done <n>           mark the n-th shown todo complete
  undo <n>           mark the n-th shown todo active
  toggle <n>         flip the n-th shown todo
  filter <name>      show all, active or completed todos
  clear              remove completed todos
  dispatch <json>    send a raw action, e.g. {\"type\":\"CLEAR_COMPLETED\"}
  state              print the state as JSON
  metrics            print Prometheus metrics
  help               show this text
  quit               exit";

/// Target completion flag of a status change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusChange {
    /// Mark complete
    Complete,
    /// Mark active again
    Reopen,
    /// Flip the current flag
    Toggle,
}

/// One line of terminal input, parsed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the input buffer
    Task(String),
    /// Add the buffered task, after replacing the buffer if text is given
    Add(Option<String>),
    /// Empty line: the Enter shortcut for adding the buffered task
    Submit,
    /// Change the status of the todo at a 1-based position in the shown list
    Status {
        /// 1-based position in the visible list
        position: usize,
        /// What to do with its flag
        change: StatusChange,
    },
    /// Pick a visibility filter
    Filter(VisibilityFilter),
    /// Clear completed todos
    Clear,
    /// Send a raw JSON action
    Dispatch(String),
    /// Print the state
    State,
    /// Print metrics
    Metrics,
    /// Print help
    Help,
    /// Exit
    Quit,
}

impl Command {
    /// Parse a line of input
    ///
    /// Command words are case-insensitive; their arguments are not.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::UnknownCommand`] for an unknown command word and
    /// [`TodoError::InvalidArgument`] for a missing or malformed argument.
    pub fn parse(line: &str) -> Result<Self, TodoError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Submit);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task(rest.to_string())),
            "add" => Ok(Self::Add((!rest.is_empty()).then(|| rest.to_string()))),
            "done" => Ok(Self::Status {
                position: parse_position("done", rest)?,
                change: StatusChange::Complete,
            }),
            "undo" => Ok(Self::Status {
                position: parse_position("undo", rest)?,
                change: StatusChange::Reopen,
            }),
            "toggle" => Ok(Self::Status {
                position: parse_position("toggle", rest)?,
                change: StatusChange::Toggle,
            }),
            "filter" => rest.parse().map(Self::Filter).map_err(|e: ParseFilterError| {
                TodoError::InvalidArgument {
                    command: "filter",
                    reason: e.to_string(),
                }
            }),
            "clear" => Ok(Self::Clear),
            "dispatch" if rest.is_empty() => Err(TodoError::InvalidArgument {
                command: "dispatch",
                reason: "expected a JSON action".to_string(),
            }),
            "dispatch" => Ok(Self::Dispatch(rest.to_string())),
            "state" => Ok(Self::State),
            "metrics" => Ok(Self::Metrics),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(TodoError::UnknownCommand(word.to_string())),
        }
    }
}

fn parse_position(command: &'static str, arg: &str) -> Result<usize, TodoError> {
    match arg.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(TodoError::InvalidArgument {
            command,
            reason: format!("expected a position starting at 1, got {arg:?}"),
        }),
    }
}

/// The todo view: translates gestures into actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoView {
    task: String,
}

impl TodoView {
    /// A view with an empty input buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            task: String::new(),
        }
    }

    /// The text typed so far
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Replace the input buffer
    pub fn update_task(&mut self, text: impl Into<String>) {
        self.task = text.into();
    }

    /// Add the buffered task and clear the buffer
    ///
    /// The buffer is only cleared once the dispatch succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::EmptyTask`] without dispatching if the buffer is
    /// empty or whitespace, or the dispatcher's error.
    pub fn add_todo<D>(&mut self, dispatcher: &mut D) -> Result<(), TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        if self.task.trim().is_empty() {
            return Err(TodoError::EmptyTask);
        }

        tracing::debug!(task = %self.task, "Adding todo");
        dispatcher.dispatch(TodoAction::add(self.task.clone()))?;
        self.task.clear();
        Ok(())
    }

    /// Set the completion flag of the todo shown at `position` (1-based)
    ///
    /// Positions refer to the list as currently filtered, so `done 1` under
    /// the `Active` filter completes the first active todo.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NoSuchPosition`] if nothing is shown there, or the
    /// dispatcher's error.
    pub fn update_todo_status<D>(
        &self,
        dispatcher: &mut D,
        state: &TodoState,
        position: usize,
        complete: bool,
    ) -> Result<TodoId, TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        let id = Self::todo_at(state, position)?.0;
        dispatcher.dispatch(TodoAction::UpdateTodoStatus { todo: id, complete })?;
        Ok(id)
    }

    /// Flip the completion flag of the todo shown at `position` (1-based)
    ///
    /// # Errors
    ///
    /// Same as [`TodoView::update_todo_status`].
    pub fn toggle_todo<D>(
        &self,
        dispatcher: &mut D,
        state: &TodoState,
        position: usize,
    ) -> Result<TodoId, TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        let complete = !Self::todo_at(state, position)?.1;
        self.update_todo_status(dispatcher, state, position, complete)
    }

    /// Apply `change` to the todo shown at `position`
    ///
    /// # Errors
    ///
    /// Same as [`TodoView::update_todo_status`].
    pub fn change_status<D>(
        &self,
        dispatcher: &mut D,
        state: &TodoState,
        position: usize,
        change: StatusChange,
    ) -> Result<TodoId, TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        match change {
            StatusChange::Complete => self.update_todo_status(dispatcher, state, position, true),
            StatusChange::Reopen => self.update_todo_status(dispatcher, state, position, false),
            StatusChange::Toggle => self.toggle_todo(dispatcher, state, position),
        }
    }

    /// Select a visibility filter
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's error.
    pub fn filter_changed<D>(&self, dispatcher: &mut D, filter: VisibilityFilter) -> Result<(), TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        dispatcher.dispatch(TodoAction::UpdateFilter { filter })?;
        Ok(())
    }

    /// Remove every completed todo
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's error.
    pub fn clear_completed<D>(&self, dispatcher: &mut D) -> Result<(), TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        dispatcher.dispatch(TodoAction::ClearCompleted)?;
        Ok(())
    }

    /// Decode a JSON action and dispatch it, returning what was dispatched
    ///
    /// Well-formed JSON that is not a known action is still dispatched, as
    /// [`TodoAction::Unrecognized`].
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::MalformedAction`] for invalid JSON, or the
    /// dispatcher's error.
    pub fn dispatch_wire<D>(&self, dispatcher: &mut D, json: &str) -> Result<TodoAction, TodoError>
    where
        D: Dispatch<TodoAction>,
    {
        let action = TodoAction::from_wire(json)?;
        dispatcher.dispatch(action.clone())?;
        Ok(action)
    }

    fn todo_at(state: &TodoState, position: usize) -> Result<(TodoId, bool), TodoError> {
        let visible = visible_todos(state);

        position
            .checked_sub(1)
            .and_then(|index| visible.get(index))
            .map(|todo| (todo.id, todo.complete))
            .ok_or(TodoError::NoSuchPosition {
                position,
                visible: visible.len(),
            })
    }
}

/// Draw the whole view for `state`
///
/// The visible list with 1-based positions, the filter row with the active
/// filter in brackets, and the counts.
#[must_use]
pub fn render(state: &TodoState, selectors: &mut TodoSelectors) -> String {
    let mut out = String::new();

    let visible = selectors.visible_todos(state);
    if visible.is_empty() {
        out.push_str("  (nothing to show)\n");
    }
    for (index, todo) in visible.iter().enumerate() {
        let mark = if todo.complete { 'x' } else { ' ' };
        let _ = writeln!(out, "  {}. [{mark}] {}", index + 1, todo.task);
    }

    out.push('\n');
    let filters: Vec<String> = VisibilityFilter::ALL
        .into_iter()
        .map(|filter| {
            if filter == state.filter {
                format!("[{filter}]")
            } else {
                format!(" {filter} ")
            }
        })
        .collect();
    let _ = writeln!(out, "  Show: {}", filters.join(" "));

    let stats = selectors.stats(state);
    let _ = write!(
        out,
        "  {} active, {} completed, {} total",
        stats.active,
        stats.completed,
        stats.total()
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_runtime::StoreError;
    use tidy_testing::RecordingDispatcher;

    #[test]
    fn parse_commands() {
        let parse = |line: &str| Command::parse(line).unwrap();

        assert_eq!(parse(""), Command::Submit);
        assert_eq!(parse("   "), Command::Submit);
        assert_eq!(parse("task buy  oat milk "), Command::Task("buy  oat milk".to_string()));
        assert_eq!(parse("add"), Command::Add(None));
        assert_eq!(parse("ADD walk dog"), Command::Add(Some("walk dog".to_string())));
        assert_eq!(
            parse("toggle 3"),
            Command::Status {
                position: 3,
                change: StatusChange::Toggle
            }
        );
        assert_eq!(parse("filter completed"), Command::Filter(VisibilityFilter::Completed));
        assert_eq!(parse("clear"), Command::Clear);
        assert_eq!(
            parse(r#"dispatch {"type":"CLEAR_COMPLETED"}"#),
            Command::Dispatch(r#"{"type":"CLEAR_COMPLETED"}"#.to_string())
        );
        assert_eq!(parse("quit"), Command::Quit);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(TodoError::UnknownCommand(word)) if word == "frobnicate"
        ));
        assert!(matches!(
            Command::parse("done 0"),
            Err(TodoError::InvalidArgument { command: "done", .. })
        ));
        assert!(matches!(
            Command::parse("undo x"),
            Err(TodoError::InvalidArgument { command: "undo", .. })
        ));
        assert!(matches!(
            Command::parse("filter someday"),
            Err(TodoError::InvalidArgument { command: "filter", .. })
        ));
        assert!(matches!(
            Command::parse("dispatch"),
            Err(TodoError::InvalidArgument { command: "dispatch", .. })
        ));
    }

    #[test]
    fn add_todo_dispatches_and_clears_buffer() {
        let mut view = TodoView::new();
        let mut recorder = RecordingDispatcher::new();

        view.update_task("buy milk");
        view.add_todo(&mut recorder).unwrap();

        assert_eq!(recorder.actions(), &[TodoAction::add("buy milk")]);
        assert_eq!(view.task(), "");
    }

    #[test]
    fn add_todo_keeps_buffer_when_dispatch_fails() {
        struct Refusing;

        impl Dispatch<TodoAction> for Refusing {
            fn dispatch(&mut self, _action: TodoAction) -> Result<(), StoreError> {
                Err(StoreError::FeedbackLimitExceeded(0))
            }
        }

        let mut view = TodoView::new();
        view.update_task("buy milk");

        assert!(matches!(
            view.add_todo(&mut Refusing),
            Err(TodoError::Store(StoreError::FeedbackLimitExceeded(0)))
        ));
        assert_eq!(view.task(), "buy milk");
    }

    #[test]
    fn add_todo_rejects_blank_task() {
        let mut view = TodoView::new();
        let mut recorder = RecordingDispatcher::new();

        assert!(matches!(view.add_todo(&mut recorder), Err(TodoError::EmptyTask)));
        view.update_task(" \t ");
        assert!(matches!(view.add_todo(&mut recorder), Err(TodoError::EmptyTask)));

        assert!(recorder.actions().is_empty());
        assert_eq!(view.task(), " \t ");
    }

    #[test]
    fn status_positions_follow_visible_list() {
        let mut state = TodoState::default();
        for (id, (task, complete)) in [("a", true), ("b", false), ("c", false)].into_iter().enumerate() {
            state.todos.push(crate::types::Todo {
                id: TodoId::new(id as u64),
                task: task.to_string(),
                complete,
            });
        }
        state.filter = VisibilityFilter::Active;

        let view = TodoView::new();
        let mut recorder = RecordingDispatcher::new();

        assert_eq!(view.update_todo_status(&mut recorder, &state, 2, true).unwrap(), TodoId::new(2));
        assert_eq!(view.toggle_todo(&mut recorder, &state, 1).unwrap(), TodoId::new(1));
        assert!(matches!(
            view.update_todo_status(&mut recorder, &state, 3, true),
            Err(TodoError::NoSuchPosition { position: 3, visible: 2 })
        ));

        assert_eq!(
            recorder.actions(),
            &[
                TodoAction::UpdateTodoStatus {
                    todo: TodoId::new(2),
                    complete: true
                },
                TodoAction::UpdateTodoStatus {
                    todo: TodoId::new(1),
                    complete: true
                },
            ]
        );
    }

    #[test]
    fn dispatch_wire_forwards_unrecognized() {
        let view = TodoView::new();
        let mut recorder = RecordingDispatcher::new();

        let action = view.dispatch_wire(&mut recorder, r#"{"type":"NOPE"}"#).unwrap();
        assert_eq!(action, TodoAction::Unrecognized);
        assert!(matches!(
            view.dispatch_wire(&mut recorder, "nope"),
            Err(TodoError::MalformedAction(_))
        ));

        assert_eq!(recorder.action_types(), vec!["UNRECOGNIZED"]);
    }

    #[test]
    fn render_snapshot() {
        let mut state = TodoState::default();
        state.todos.push(crate::types::Todo {
            id: TodoId::new(0),
            task: "buy milk".to_string(),
            complete: true,
        });
        state.todos.push(crate::types::Todo {
            id: TodoId::new(1),
            task: "walk dog".to_string(),
            complete: false,
        });

        let rendered = render(&state, &mut TodoSelectors::new());

        assert_eq!(
            rendered,
            "  1. [x] buy milk\n  2. [ ] walk dog\n\n  Show: [All]  Active   Completed \n  1 active, 1 completed, 2 total"
        );
    }

    #[test]
    fn render_empty_list() {
        let state = TodoState::with_filter(VisibilityFilter::Completed);
        let rendered = render(&state, &mut TodoSelectors::new());

        assert!(rendered.starts_with("  (nothing to show)\n"));
        assert!(rendered.contains("[Completed]"));
    }
}
