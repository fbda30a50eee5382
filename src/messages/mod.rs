//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Persistence layers.

pub mod ui_events;
pub mod persistence;
pub mod render;

pub use ui_events::{Focus, UiEvent};
pub use persistence::{PersistCommand, PersistResponse};
pub use render::RenderState;
