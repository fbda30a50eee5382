//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Key under which the task list is persisted
pub const STORAGE_KEY: &str = "todo";

/// Data directory name under the home directory
pub const DATA_DIR_NAME: &str = ".tasklet";

/// Environment variable overriding the data directory
pub const HOME_ENV_VAR: &str = "TASKLET_HOME";

/// Configuration file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "tasklet.log";

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Delay before a save is written, so bursts coalesce into one write
pub const DEFAULT_SAVE_DEBOUNCE_MS: u64 = 150;

/// How long a toast stays on screen
pub const DEFAULT_TOAST_DURATION_MS: u64 = 2000;

/// Toasts kept on screen at once
pub const MAX_TOASTS: usize = 3;

pub const SAVE_OK_MESSAGE: &str = "Tasks saved";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save tasks";
pub const LOAD_FAILED_MESSAGE: &str = "Stored tasks were unreadable and have been set aside";

/// Application name
pub const APP_NAME: &str = "Tasklet";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
