//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::Focus;
use crate::models::{Filter, Task, Toast};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Task list (already filtered)
    pub rows: Vec<Task>,
    pub selected: Option<usize>,
    pub total: usize,
    pub completed: usize,
    pub filter: Filter,

    // Input field
    pub input: String,
    pub cursor_position: usize,
    pub focus: Focus,
    /// Name of the task being renamed, if an edit session is active
    pub editing: Option<String>,

    // Popups
    /// Name of the task awaiting delete confirmation
    pub delete_prompt: Option<String>,
    pub show_help: bool,

    // Persistence
    pub toasts: Vec<Toast>,
    pub saving: bool,
}

impl RenderState {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn primary_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Task"
        } else {
            "Add Task"
        }
    }

    pub fn secondary_label(&self) -> &'static str {
        if self.is_editing() {
            "Cancel"
        } else {
            "Clear"
        }
    }
}
