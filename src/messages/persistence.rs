//! Persistence messages - communication between App and Persistence layers

use crate::models::Task;

/// Commands sent from App layer to Persistence layer
#[derive(Debug, Clone)]
pub enum PersistCommand {
    /// Write a snapshot of the full task list
    Save {
        revision: u64,
        tasks: Vec<Task>,
    },
    /// Flush pending writes and stop
    Shutdown,
}

/// Results sent from Persistence layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum PersistResponse {
    Saved {
        revision: u64,
    },
    Failed {
        revision: u64,
        error: String,
    },
}

impl PersistResponse {
    /// Revision of the snapshot this result refers to
    pub fn revision(&self) -> u64 {
        match self {
            PersistResponse::Saved { revision } => *revision,
            PersistResponse::Failed { revision, .. } => *revision,
        }
    }
}
