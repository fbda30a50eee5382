//! App state - pure data structure with no I/O logic

use crate::constants::DEFAULT_TOAST_DURATION_MS;
use crate::messages::ui_events::Focus;
use crate::messages::RenderState;
use crate::models::{assign_missing_ids, renumber_ids, Filter, Task, TaskId, Toast};

/// Which task, if any, is being renamed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(TaskId),
}

/// Delete confirmation dialog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteDialog {
    #[default]
    Closed,
    Open(TaskId),
}

/// Main application state - pure data, no I/O
#[derive(Clone, Debug)]
pub struct AppState {
    // Authoritative task list
    pub tasks: Vec<Task>,
    pub filter: Filter,

    // Input field
    pub input: String,
    pub cursor_position: usize,
    pub focus: Focus,

    /// Index into the visible (filtered) list
    pub selected: usize,

    pub edit: EditSession,
    pub delete: DeleteDialog,
    pub show_help: bool,

    pub toasts: Vec<Toast>,
    pub toast_ttl: chrono::Duration,

    /// Bumped on every change to `tasks`
    pub revision: u64,
    /// Newest revision confirmed written
    pub saved_revision: u64,

    pub(crate) next_id: TaskId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AppState {
    /// Build state around a loaded task list, numbering tasks that have no id
    pub fn new(mut tasks: Vec<Task>) -> Self {
        let next_id = assign_missing_ids(&mut tasks);
        AppState {
            tasks,
            filter: Filter::All,
            input: String::new(),
            cursor_position: 0,
            focus: Focus::Input,
            selected: 0,
            edit: EditSession::Idle,
            delete: DeleteDialog::Closed,
            show_help: false,
            toasts: Vec::new(),
            toast_ttl: chrono::Duration::milliseconds(DEFAULT_TOAST_DURATION_MS as i64),
            revision: 0,
            saved_revision: 0,
            next_id,
        }
    }

    pub fn with_toast_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.toast_ttl = ttl;
        self
    }

    /// Generate a unique task ID
    pub fn next_id(&mut self) -> TaskId {
        if self.next_id.0 == u64::MAX {
            self.compact_ids();
        }
        let id = self.next_id;
        self.next_id = TaskId(id.0 + 1);
        id
    }

    /// Renumber tasks 1..=n, carrying open edit and delete targets along
    fn compact_ids(&mut self) {
        let old: Vec<Option<TaskId>> = self.tasks.iter().map(|t| t.id).collect();
        self.next_id = renumber_ids(&mut self.tasks);
        let remap = |target: TaskId| {
            old.iter()
                .position(|id| *id == Some(target))
                .map(|i| TaskId(i as u64 + 1))
        };

        self.edit = match self.edit {
            EditSession::Editing(id) => remap(id).map_or(EditSession::Idle, EditSession::Editing),
            EditSession::Idle => EditSession::Idle,
        };
        self.delete = match self.delete {
            DeleteDialog::Open(id) => remap(id).map_or(DeleteDialog::Closed, DeleteDialog::Open),
            DeleteDialog::Closed => DeleteDialog::Closed,
        };
        tracing::warn!(count = self.tasks.len(), "Task ids exhausted; renumbered");
    }

    /// Tasks passing the active filter, in list order
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        let filter = self.filter;
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    pub fn visible_len(&self) -> usize {
        self.visible_tasks().count()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().nth(self.selected)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.has_id(id))
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.has_id(id))
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditSession::Editing(_))
    }

    /// True while a written snapshot is older than the in-memory list
    pub fn is_dirty(&self) -> bool {
        self.saved_revision < self.revision
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let rows: Vec<Task> = self.visible_tasks().cloned().collect();
        let selected = if rows.is_empty() {
            None
        } else {
            Some(self.selected.min(rows.len() - 1))
        };

        let editing = match self.edit {
            EditSession::Editing(id) => self.task(id).map(|t| t.name.clone()),
            EditSession::Idle => None,
        };
        let delete_prompt = match self.delete {
            DeleteDialog::Open(id) => self.task(id).map(|t| t.name.clone()),
            DeleteDialog::Closed => None,
        };

        RenderState {
            rows,
            selected,
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.is_completed).count(),
            filter: self.filter,
            input: self.input.clone(),
            cursor_position: self.cursor_position,
            focus: self.focus,
            editing,
            delete_prompt,
            show_help: self.show_help,
            toasts: self.toasts.clone(),
            saving: self.is_dirty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_numbers_unidentified_tasks() {
        let tasks = vec![
            Task { id: None, name: "a".into(), is_completed: false },
            Task { id: Some(TaskId(4)), name: "b".into(), is_completed: true },
        ];
        let mut state = AppState::new(tasks);
        assert_eq!(state.tasks[0].id, Some(TaskId(5)));
        assert_eq!(state.next_id(), TaskId(6));
        assert_eq!(state.next_id(), TaskId(7));
    }

    #[test]
    fn test_stored_max_id_loads_and_accepts_new_tasks() {
        let tasks: Vec<Task> =
            serde_json::from_str(r#"[{"id":18446744073709551615,"name":"a","isCompleted":false}]"#)
                .unwrap();
        let mut state = AppState::new(tasks);
        let id = state.next_id();
        assert_eq!(state.tasks[0].id, Some(TaskId(1)));
        assert_eq!(id, TaskId(2));
    }

    #[test]
    fn test_exhausted_ids_renumber_and_keep_sessions() {
        let mut state = AppState::new(vec![
            Task::new(TaskId(7), "a"),
            Task::new(TaskId(u64::MAX - 1), "b"),
        ]);
        assert_eq!(state.next_id, TaskId(u64::MAX));
        state.edit = EditSession::Editing(TaskId(u64::MAX - 1));
        state.delete = DeleteDialog::Open(TaskId(7));

        let id = state.next_id();
        assert_eq!(id, TaskId(3));
        assert_eq!(state.tasks[0].id, Some(TaskId(1)));
        assert_eq!(state.tasks[1].id, Some(TaskId(2)));
        assert_eq!(state.edit, EditSession::Editing(TaskId(2)));
        assert_eq!(state.delete, DeleteDialog::Open(TaskId(1)));
        assert_eq!(state.next_id(), TaskId(4));
    }

    #[test]
    fn test_render_state_reflects_filter() {
        let mut done = Task::new(TaskId(1), "done");
        done.is_completed = true;
        let mut state = AppState::new(vec![done, Task::new(TaskId(2), "open")]);
        state.filter = Filter::Incomplete;

        let render = state.to_render_state();
        assert_eq!(render.rows.len(), 1);
        assert_eq!(render.rows[0].name, "open");
        assert_eq!(render.total, 2);
        assert_eq!(render.completed, 1);
        assert_eq!(render.selected, Some(0));
    }

    #[test]
    fn test_render_state_empty_list_has_no_selection() {
        let render = AppState::default().to_render_state();
        assert_eq!(render.selected, None);
        assert_eq!(render.primary_label(), "Add Task");
        assert_eq!(render.secondary_label(), "Clear");
    }
}
