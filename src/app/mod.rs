//! App layer - central state management and the reducer
//!
//! The App actor receives UI events and persistence results,
//! reduces them into state, and emits save commands and render state.

pub mod state;
pub mod reducer;
pub mod commands;
pub mod actor;

pub use state::{AppState, DeleteDialog, EditSession};
pub use reducer::{reduce, Action};
pub use actor::AppActor;
