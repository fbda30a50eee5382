//! User configuration loaded from `config.yaml` in the tasklet home directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_FILE_NAME, DATA_DIR_NAME, DEFAULT_SAVE_DEBOUNCE_MS, DEFAULT_TOAST_DURATION_MS,
    HOME_ENV_VAR,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Where `todo.json` and the log file live. Defaults to the home directory.
    pub data_dir: Option<PathBuf>,
    pub save_debounce_ms: u64,
    pub toast_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

impl Config {
    /// Tasklet home: `$TASKLET_HOME`, else `~/.tasklet`
    pub fn home_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(HOME_ENV_VAR) {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    /// Load `config.yaml` from `home`. A missing file yields defaults.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => home.join(dir),
            None => home.to_path_buf(),
        }
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn toast_duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.toast_duration_ms.min(i64::MAX as u64) as i64)
    }
}
