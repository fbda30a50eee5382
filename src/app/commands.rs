//! Command handlers - state transitions behind each action

use chrono::{DateTime, Utc};

use crate::app::state::{AppState, DeleteDialog, EditSession};
use crate::constants::{MAX_TOASTS, SAVE_FAILED_MESSAGE, SAVE_OK_MESSAGE};
use crate::messages::ui_events::Focus;
use crate::models::{Filter, Task, TaskId, Toast};

impl AppState {
    // ========================
    // Input editing
    // ========================

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position.min(self.input.len());
        self.input.insert(cursor_pos, c);
        self.cursor_position = cursor_pos + c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let prev_pos = self.input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position = self.input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.len() {
            self.cursor_position = self.input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.input.len());
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor_position = self.input.len();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    // ========================
    // Task list mutations
    // ========================

    /// Primary button: adds a task, or applies the rename while editing
    pub fn submit(&mut self) {
        let name = self.input.trim().to_string();
        if name.is_empty() {
            return;
        }

        match self.edit {
            EditSession::Editing(id) => {
                self.rename_task(id, &name);
                self.edit = EditSession::Idle;
                self.focus = Focus::List;
            }
            EditSession::Idle => self.add_task(&name),
        }
        self.clear_input();
    }

    /// Secondary button: "Clear" when idle, "Cancel" while editing
    pub fn clear_or_cancel(&mut self) {
        self.edit = EditSession::Idle;
        self.clear_input();
        self.focus = Focus::List;
    }

    pub fn add_task(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let id = self.next_id();
        self.tasks.push(Task::new(id, name));
        self.touch();
        tracing::debug!(%id, "Added task");
    }

    pub fn rename_task(&mut self, id: TaskId, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Some(task) = self.task_mut(id) {
            task.name = name.to_string();
            self.touch();
            tracing::debug!(%id, "Renamed task");
        }
    }

    pub fn set_completed(&mut self, id: TaskId, value: bool) {
        if let Some(task) = self.task_mut(id) {
            task.is_completed = value;
            self.touch();
        }
        self.end_edit_session();
        self.clamp_selection();
    }

    pub fn remove_task(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.has_id(id));
        if self.tasks.len() != before {
            self.touch();
            tracing::debug!(%id, "Removed task");
        }
        self.clamp_selection();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ========================
    // Edit session
    // ========================

    pub fn begin_edit(&mut self, id: TaskId) {
        let Some(name) = self.task(id).map(|t| t.name.clone()) else {
            return;
        };
        self.edit = EditSession::Editing(id);
        self.set_input(name);
        self.focus = Focus::Input;
    }

    /// Drop an active edit session along with its unsaved text
    fn end_edit_session(&mut self) {
        if self.is_editing() {
            self.edit = EditSession::Idle;
            self.clear_input();
        }
    }

    // ========================
    // Delete confirmation
    // ========================

    pub fn request_delete(&mut self, id: TaskId) {
        if self.task(id).is_some() {
            self.delete = DeleteDialog::Open(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        if let DeleteDialog::Open(id) = self.delete {
            self.remove_task(id);
            self.end_edit_session();
        }
        self.delete = DeleteDialog::Closed;
    }

    pub fn dismiss_delete(&mut self) {
        self.delete = DeleteDialog::Closed;
    }

    // ========================
    // Filter & selection
    // ========================

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.end_edit_session();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1).min(len - 1);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Persistence results & toasts
    // ========================

    pub fn save_succeeded(&mut self, revision: u64, at: DateTime<Utc>) {
        self.saved_revision = self.saved_revision.max(revision);
        self.push_toast(Toast::success(SAVE_OK_MESSAGE, at));
    }

    pub fn save_failed(&mut self, revision: u64, error: &str, at: DateTime<Utc>) {
        tracing::warn!(revision, error, "Save failed");
        self.push_toast(Toast::error(format!("{SAVE_FAILED_MESSAGE}: {error}"), at));
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }

    pub fn expire_toasts(&mut self, now: DateTime<Utc>) {
        let ttl = self.toast_ttl;
        self.toasts.retain(|t| !t.is_expired(now, ttl));
    }
}
