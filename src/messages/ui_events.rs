//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Filter;

/// Which widget receives typed keys
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Focus {
    Input,
    #[default]
    List,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Input field
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,
    ClearInput,
    FocusInput,
    FocusList,

    // Task list
    NextTask,
    PrevTask,
    ToggleSelected,
    EditSelected,
    DeleteSelected,

    // Filter
    CycleFilter,
    SetFilter(Filter),

    // Delete confirmation
    ConfirmDelete,
    DismissDelete,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    focus: Focus,
    editing: bool,
    show_help: bool,
    confirming_delete: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(UiEvent::Quit),
            _ => None,
        };
    }

    // Popups swallow keys first
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if confirming_delete {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(UiEvent::ConfirmDelete),
            _ => Some(UiEvent::DismissDelete),
        };
    }

    match focus {
        Focus::Input => handle_input_keys(key),
        Focus::List => handle_list_keys(key, editing),
    }
}

/// Handle keys while the text input has focus
fn handle_input_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::ClearInput),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab => Some(UiEvent::FocusList),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

/// Handle keys while the task list has focus
fn handle_list_keys(key: KeyEvent, editing: bool) -> Option<UiEvent> {
    // Navigation stays available during an edit session
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => return Some(UiEvent::PrevTask),
        KeyCode::Down | KeyCode::Char('j') => return Some(UiEvent::NextTask),
        KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('i') => return Some(UiEvent::FocusInput),
        KeyCode::Esc if editing => return Some(UiEvent::ClearInput),
        _ => {}
    }

    // Row actions and the filter are disabled while a task is being edited
    if editing {
        return None;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('x') => Some(UiEvent::ToggleSelected),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::EditSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(UiEvent::DeleteSelected),
        KeyCode::Char('f') => Some(UiEvent::CycleFilter),
        KeyCode::Char('1') => Some(UiEvent::SetFilter(Filter::All)),
        KeyCode::Char('2') => Some(UiEvent::SetFilter(Filter::Completed)),
        KeyCode::Char('3') => Some(UiEvent::SetFilter(Filter::Incomplete)),
        _ => None,
    }
}
