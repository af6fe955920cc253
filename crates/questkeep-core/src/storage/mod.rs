mod config;
pub mod database;

pub use config::{ApiConfig, Config, TimerConfig};
pub use database::{Database, SessionRecord, Stats};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `QUESTKEEP_DATA_DIR` wins when set. Otherwise `~/.config/questkeep/`, or
/// `~/.config/questkeep-dev/` with `QUESTKEEP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("QUESTKEEP_DATA_DIR") {
        Some(explicit) if !explicit.is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("QUESTKEEP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("questkeep-dev")
            } else {
                base_dir.join("questkeep")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
