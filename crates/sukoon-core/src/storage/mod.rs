mod config;
mod kv;
mod sqlite;

pub use config::{BreathingConfig, ChatConfig, ChatProvider, Config};
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `SUKOON_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/sukoon/`, or `~/.config/sukoon-dev/` when `SUKOON_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SUKOON_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SUKOON_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("sukoon-dev")
            } else {
                base_dir.join("sukoon")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
