mod list;
mod settings;

pub use list::{JsonFileStore, ListStore, MemoryListStore};
pub use settings::{MemorySettingsStore, SettingsStore, TimerSettings, TomlSettingsStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/focustray[-dev]/` based on FOCUSTRAY_ENV.
///
/// Set FOCUSTRAY_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSTRAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focustray-dev")
    } else {
        base_dir.join("focustray")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
