//! Tasklet TUI - Actor-based terminal to-do list
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Persistence Layer (Tokio) - ordered task list writes

use std::fs;
use std::io;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tasklet_tui::constants::{DEFAULT_LOG_LEVEL, LOAD_FAILED_MESSAGE, LOG_FILE_NAME};
use tasklet_tui::messages::ui_events::key_to_ui_event;
use tasklet_tui::{
    Action, AppActor, AppState, Config, FileStore, PersistCommand, PersistResponse,
    PersistenceActor, LoadOutcome, RenderState, TaskStore, Toast, UiEvent,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let home = Config::home_dir();
    let config = Config::load(&home)?;
    let data_dir = config.resolve_data_dir(&home);
    fs::create_dir_all(&data_dir)?;

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(&data_dir, LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(data_dir = %data_dir.display(), "Starting tasklet");

    // Load tasks before the terminal is taken over
    let store = TaskStore::new(FileStore::new(&data_dir));
    let state = load_state(&store, &config)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (persist_cmd_tx, persist_cmd_rx) = mpsc::unbounded_channel::<PersistCommand>();
    let (persist_resp_tx, persist_resp_rx) = mpsc::unbounded_channel::<PersistResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn persistence actor
    let persistence_actor = PersistenceActor::new(store, persist_resp_tx, config.save_debounce());
    let persistence_handle = tokio::spawn(persistence_actor.run(persist_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, persist_cmd_tx, render_tx);
    let app_handle = tokio::spawn(app_actor.run(ui_rx, persist_resp_rx));

    // Run UI loop (synchronous with async polling)
    let result = run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await;

    // Let pending writes land before exiting
    let _ = app_handle.await;
    let _ = persistence_handle.await;
    tracing::info!("Exited cleanly");

    result
}

/// Refuses to start when stored tasks can neither be read nor set aside
fn load_state(store: &TaskStore<FileStore>, config: &Config) -> anyhow::Result<AppState> {
    let outcome = store
        .load_or_quarantine(Utc::now())
        .context("Could not load stored tasks")?;

    let state = match outcome {
        LoadOutcome::Loaded(tasks) => {
            tracing::info!(count = tasks.len(), "Loaded tasks");
            AppState::new(tasks).with_toast_ttl(config.toast_duration())
        }
        LoadOutcome::Quarantined { aside } => {
            tracing::warn!(aside = %aside, "Starting with an empty list");
            let mut state = AppState::new(Vec::new()).with_toast_ttl(config.toast_duration());
            state.apply(Action::Notify(Toast::error(LOAD_FAILED_MESSAGE, Utc::now())));
            state
        }
    };
    Ok(state)
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| tasklet_tui::ui::draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.focus,
                    current_state.is_editing(),
                    current_state.show_help,
                    current_state.delete_prompt.is_some(),
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}
