//! App actor - message loop processing UI events and persistence results

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::app::reducer::Action;
use crate::app::state::AppState;
use crate::messages::{PersistCommand, PersistResponse, RenderState, UiEvent};

/// How often expired toasts are swept
const TOAST_SWEEP_INTERVAL: Duration = Duration::from_millis(250);

/// App actor that owns the state and drives the reducer
pub struct AppActor {
    state: AppState,
    persist_tx: mpsc::UnboundedSender<PersistCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        persist_tx: mpsc::UnboundedSender<PersistCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            persist_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut persist_rx: mpsc::UnboundedReceiver<PersistResponse>,
    ) {
        let mut sweep = tokio::time::interval(TOAST_SWEEP_INTERVAL);
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Send initial render state
        self.render();

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    match event {
                        Some(UiEvent::Quit) | None => {
                            tracing::info!("Shutting down app actor");
                            let _ = self.persist_tx.send(PersistCommand::Shutdown);
                            break;
                        }
                        Some(event) => {
                            if let Some(action) = self.state.action_for(event) {
                                self.dispatch(action);
                            }
                            self.render();
                        }
                    }
                }
                Some(response) = persist_rx.recv() => {
                    tracing::debug!(revision = response.revision(), current = self.state.revision, "Save result");
                    self.dispatch(Action::from_persist_response(response, Utc::now()));
                    self.render();
                }
                _ = sweep.tick() => {
                    if !self.state.toasts.is_empty() {
                        let before = self.state.toasts.len();
                        self.dispatch(Action::ExpireToasts(Utc::now()));
                        if self.state.toasts.len() != before {
                            self.render();
                        }
                    }
                }
            }
        }
    }

    /// Apply an action and queue a save if the task list changed
    fn dispatch(&mut self, action: Action) {
        let before = self.state.revision;
        self.state.apply(action);

        if self.state.revision != before {
            let command = PersistCommand::Save {
                revision: self.state.revision,
                tasks: self.state.tasks.clone(),
            };
            if self.persist_tx.send(command).is_err() {
                tracing::error!(revision = self.state.revision, "Persistence layer is gone; change not saved");
            }
        }
    }

    fn render(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }
}
