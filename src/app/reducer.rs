//! Reducer - every state transition goes through `reduce`/`apply`
//!
//! Actions are id-based and carry their own timestamps, so applying one
//! never touches I/O or the clock. The actor compares `revision` before and
//! after to decide whether the list must be persisted.

use chrono::{DateTime, Utc};

use crate::app::state::AppState;
use crate::messages::ui_events::Focus;
use crate::messages::{PersistResponse, UiEvent};
use crate::models::{Filter, TaskId, Toast};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // Input field
    InsertChar(char),
    Backspace,
    CursorLeft,
    CursorRight,
    SetInput(String),
    Submit,
    ClearInput,
    Focus(Focus),

    // Tasks
    BeginEdit(TaskId),
    SetCompleted(TaskId, bool),
    RequestDelete(TaskId),
    ConfirmDelete,
    DismissDelete,

    // View
    SetFilter(Filter),
    SelectNext,
    SelectPrev,
    ToggleHelp,
    CloseHelp,

    // Persistence & notifications
    SaveSucceeded { revision: u64, at: DateTime<Utc> },
    SaveFailed { revision: u64, error: String, at: DateTime<Utc> },
    Notify(Toast),
    ExpireToasts(DateTime<Utc>),
}

impl Action {
    pub fn from_persist_response(response: PersistResponse, at: DateTime<Utc>) -> Self {
        match response {
            PersistResponse::Saved { revision } => Action::SaveSucceeded { revision, at },
            PersistResponse::Failed { revision, error } => Action::SaveFailed { revision, error, at },
        }
    }
}

/// Pure reducer: `(state, action) -> state`
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    state.apply(action);
    state
}

impl AppState {
    /// Apply an action in place
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::InsertChar(c) => self.enter_char(c),
            Action::Backspace => self.delete_char(),
            Action::CursorLeft => self.move_cursor_left(),
            Action::CursorRight => self.move_cursor_right(),
            Action::SetInput(text) => self.set_input(text),
            Action::Submit => self.submit(),
            Action::ClearInput => self.clear_or_cancel(),
            Action::Focus(focus) => self.set_focus(focus),

            Action::BeginEdit(id) => self.begin_edit(id),
            Action::SetCompleted(id, value) => self.set_completed(id, value),
            Action::RequestDelete(id) => self.request_delete(id),
            Action::ConfirmDelete => self.confirm_delete(),
            Action::DismissDelete => self.dismiss_delete(),

            Action::SetFilter(filter) => self.set_filter(filter),
            Action::SelectNext => self.select_next(),
            Action::SelectPrev => self.select_prev(),
            Action::ToggleHelp => self.toggle_help(),
            Action::CloseHelp => self.close_help(),

            Action::SaveSucceeded { revision, at } => self.save_succeeded(revision, at),
            Action::SaveFailed { revision, error, at } => self.save_failed(revision, &error, at),
            Action::Notify(toast) => self.push_toast(toast),
            Action::ExpireToasts(now) => self.expire_toasts(now),
        }
    }

    /// Resolve a UI event against the current selection.
    /// Returns `None` when the event has no effect (e.g. empty list) or is `Quit`.
    pub fn action_for(&self, event: UiEvent) -> Option<Action> {
        let selected_id = || self.selected_task().and_then(|t| t.id);

        let action = match event {
            UiEvent::CharInput(c) => Action::InsertChar(c),
            UiEvent::Backspace => Action::Backspace,
            UiEvent::CursorLeft => Action::CursorLeft,
            UiEvent::CursorRight => Action::CursorRight,
            UiEvent::Submit => Action::Submit,
            UiEvent::ClearInput => Action::ClearInput,
            UiEvent::FocusInput => Action::Focus(Focus::Input),
            UiEvent::FocusList => Action::Focus(Focus::List),

            UiEvent::NextTask => Action::SelectNext,
            UiEvent::PrevTask => Action::SelectPrev,
            UiEvent::ToggleSelected => {
                let task = self.selected_task()?;
                Action::SetCompleted(task.id?, !task.is_completed)
            }
            UiEvent::EditSelected => Action::BeginEdit(selected_id()?),
            UiEvent::DeleteSelected => Action::RequestDelete(selected_id()?),

            UiEvent::CycleFilter => Action::SetFilter(self.filter.next()),
            UiEvent::SetFilter(filter) => Action::SetFilter(filter),

            UiEvent::ConfirmDelete => Action::ConfirmDelete,
            UiEvent::DismissDelete => Action::DismissDelete,

            UiEvent::ToggleHelp => Action::ToggleHelp,
            UiEvent::CloseHelp => Action::CloseHelp,

            UiEvent::Quit => return None,
        };
        Some(action)
    }
}
