//! # Tasklet TUI
//!
//! A single-screen terminal to-do list.
//!
//! ## Features
//! - Add, rename, complete and delete tasks
//! - Filter by All / Completed / Incomplete
//! - Delete confirmation dialog
//! - Tasks persisted as JSON under `~/.tasklet/todo.json`
//! - Save notifications (toasts)
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (state + pure reducer)
//! - Persistence Layer (Tokio runtime, single writer)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod persistence;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{reduce, Action, AppActor, AppState};
pub use config::Config;
pub use messages::{PersistCommand, PersistResponse, RenderState, UiEvent};
pub use models::{Filter, Task, TaskId, Toast, ToastKind};
pub use persistence::PersistenceActor;
pub use storage::{FileStore, KeyValueStore, LoadOutcome, MemoryStore, StoreError, TaskStore};
