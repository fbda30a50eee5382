//! UI drawing - renders a `RenderState` into a ratatui frame

use ratatui::{prelude::*, widgets::*};

use crate::constants::APP_NAME;
use crate::messages::ui_events::Focus;
use crate::messages::RenderState;
use crate::models::{Filter, Task, Toast, ToastKind};

pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Input
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Filter
            Constraint::Min(3),    // Task list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title(f, state, chunks[0]);
    draw_input(f, state, chunks[1]);
    draw_buttons(f, state, chunks[2]);
    draw_filter(f, state, chunks[3]);
    draw_task_list(f, state, chunks[4]);
    draw_status_bar(f, state, chunks[5]);

    if !state.toasts.is_empty() {
        draw_toasts(f, &state.toasts, area);
    }

    if let Some(name) = &state.delete_prompt {
        draw_confirm_popup(f, name, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_title(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(format!(" {APP_NAME} "), Style::default().fg(Color::Black).bg(Color::Green).bold()),
        Span::raw(format!("  {}/{} done", state.completed, state.total)),
    ];
    if state.saving {
        spans.push(Span::styled("  saving...", Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.focus == Focus::Input;
    let border_style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let title = match &state.editing {
        Some(name) => format!(" Editing \"{name}\" "),
        None => String::from(" New task "),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let input = if state.input.is_empty() && !is_focused {
        Paragraph::new("Enter task").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(state.input.as_str())
    };
    f.render_widget(input.block(block), area);

    if is_focused {
        let column = text_width(&state.input[..state.cursor_position.min(state.input.len())]);
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let cursor_x = area.x.saturating_add(column).saturating_add(1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y.saturating_add(1)));
    }
}

/// Character count clamped to a terminal coordinate
fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn draw_buttons(f: &mut Frame, state: &RenderState, area: Rect) {
    let button = Style::default().fg(Color::White).bg(Color::Green).bold();
    let line = Line::from(vec![
        Span::styled(format!(" Enter: {} ", state.primary_label()), button),
        Span::raw("  "),
        Span::styled(format!(" Esc: {} ", state.secondary_label()), button),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_filter(f: &mut Frame, state: &RenderState, area: Rect) {
    // Filter is locked during an edit session
    let disabled = state.is_editing();
    let titles: Vec<Line> = Filter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| Line::from(format!("{}:{}", i + 1, filter.label())))
        .collect();

    let (style, highlight) = if disabled {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray).underlined(),
        )
    } else {
        (
            Style::default().fg(Color::Gray),
            Style::default().fg(Color::Yellow).bold(),
        )
    };

    let tabs = Tabs::new(titles)
        .select(state.filter.index())
        .style(style)
        .highlight_style(highlight)
        .divider("|");

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);
    f.render_widget(Paragraph::new(" Filter:").style(style), chunks[0]);
    f.render_widget(tabs, chunks[1]);
}

fn task_row(task: &Task, disabled: bool) -> ListItem<'static> {
    let checkbox = if task.is_completed { "[x] " } else { "[ ] " };
    let checkbox_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green)
    };
    let name_style = if task.is_completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::styled(checkbox, checkbox_style),
        Span::styled(task.name.clone(), name_style),
    ]))
}

fn draw_task_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.focus == Focus::List;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = format!(" Tasks ({}) ", state.rows.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if state.rows.is_empty() {
        let hint = match state.filter {
            Filter::All => "No tasks yet. Type one above and press Enter.",
            Filter::Completed => "No completed tasks.",
            Filter::Incomplete => "Nothing left to do.",
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|task| task_row(task, state.is_editing()))
        .collect();

    let highlight_style = if is_focused {
        Style::default().bg(Color::DarkGray).bold()
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(state.selected);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match state.focus {
        Focus::Input => " Enter:save | Esc:clear/cancel | Tab:list | Ctrl+C:quit ",
        Focus::List if state.is_editing() => " Editing - Tab/a:back to input | Esc:cancel | q:quit ",
        Focus::List => " Space:toggle | e:edit | d:delete | f:filter | a:add | ?:help | q:quit ",
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_toasts(f: &mut Frame, toasts: &[Toast], area: Rect) {
    let width = toasts
        .iter()
        .map(|t| text_width(&t.message).saturating_add(4))
        .max()
        .unwrap_or(0)
        .min(area.width);

    // Newest at the top, stacked down from the top-right corner
    for (i, toast) in toasts.iter().rev().enumerate() {
        let y = area.y.saturating_add(1).saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
        if y >= area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width), y, width, 1);
        let (icon, style) = match toast.kind {
            ToastKind::Success => ("✓", Style::default().fg(Color::Black).bg(Color::Green)),
            ToastKind::Error => ("✗", Style::default().fg(Color::White).bg(Color::Red)),
        };
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(format!(" {icon} {}", toast.message)).style(style),
            rect,
        );
    }
}

fn draw_confirm_popup(f: &mut Frame, name: &str, area: Rect) {
    let popup_area = centered_rect(70, 40, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm Delete ")
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let text = vec![
        Line::from(""),
        Line::from(format!("Are you sure you want to delete \"{name}\"?")),
        Line::from(""),
        Line::from(vec![
            Span::styled(" y: YES ", Style::default().fg(Color::White).bg(Color::Red).bold()),
            Span::raw("   "),
            Span::styled(" n: NO ", Style::default().fg(Color::Black).bg(Color::Gray).bold()),
        ]),
    ];

    let dialog = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(dialog, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TASKLET - Keyboard Shortcuts

 TASK LIST
   ↑ / k, ↓ / j       Move selection
   Space / x          Toggle completed
   e / Enter          Edit selected task
   d / Delete         Delete selected task
   f                  Cycle filter
   1 / 2 / 3          All / Completed / Incomplete
   a / i / Tab        Go to input

 INPUT
   Enter              Add Task / Update Task
   Esc                Clear / Cancel edit
   Tab                Go to list

 While editing, toggling, deleting and
 filtering are disabled.

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use ratatui::backend::TestBackend;

    fn render(state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn with_tasks() -> RenderState {
        let mut done = Task::new(TaskId(1), "Buy milk");
        done.is_completed = true;
        RenderState {
            rows: vec![done, Task::new(TaskId(2), "Walk dog")],
            selected: Some(0),
            total: 2,
            completed: 1,
            ..RenderState::default()
        }
    }

    #[test]
    fn test_rows_show_checkboxes() {
        let text = render(&with_tasks());
        assert!(text.contains("[x] Buy milk"));
        assert!(text.contains("[ ] Walk dog"));
        assert!(text.contains("1/2 done"));
        assert!(text.contains("Add Task"));
        assert!(text.contains("Clear"));
    }

    #[test]
    fn test_edit_session_changes_labels() {
        let state = RenderState {
            editing: Some("Walk dog".into()),
            input: "Walk dog".into(),
            focus: Focus::Input,
            ..with_tasks()
        };
        let text = render(&state);
        assert!(text.contains("Update Task"));
        assert!(text.contains("Cancel"));
        assert!(text.contains("Editing \"Walk dog\""));
    }

    #[test]
    fn test_empty_list_hint_follows_filter() {
        let state = RenderState {
            filter: Filter::Completed,
            ..RenderState::default()
        };
        assert!(render(&state).contains("No completed tasks."));
    }

    #[test]
    fn test_confirm_popup() {
        let state = RenderState {
            delete_prompt: Some("Buy milk".into()),
            ..with_tasks()
        };
        let text = render(&state);
        assert!(text.contains("Confirm Delete"));
        assert!(text.contains("delete \"Buy milk\"?"));
    }

    #[test]
    fn test_toast_overlay() {
        let state = RenderState {
            toasts: vec![Toast::error("Failed to save tasks", chrono::Utc::now())],
            ..with_tasks()
        };
        assert!(render(&state).contains("Failed to save tasks"));
    }

    #[test]
    fn test_text_width_clamps() {
        assert_eq!(text_width("héllo"), 5);
        assert_eq!(text_width(&"x".repeat(70_000)), u16::MAX);
    }

    #[test]
    fn test_oversized_input_and_toast_render() {
        let long = "x".repeat(70_000);
        let state = RenderState {
            input: long.clone(),
            cursor_position: long.len(),
            focus: Focus::Input,
            toasts: vec![Toast::error(long, chrono::Utc::now())],
            ..with_tasks()
        };
        assert!(render(&state).contains("xxxx"));
    }
}
