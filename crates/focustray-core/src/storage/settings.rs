//! Persisted timer settings.
//!
//! Scalar user preferences: work/break durations, prompt-sound behavior, and
//! the status-bar icon toggle. The TOML-backed store lives at
//! `~/.config/focustray/settings.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::PromptWindow;

/// User-tunable timer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work period length in minutes.
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Break period length in minutes.
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Master switch for start/end chimes and the micro-break prompt cycle.
    #[serde(default = "default_true")]
    pub prompt_sound_enabled: bool,
    /// Lower bound of the random prompt interval, in minutes.
    #[serde(default = "default_prompt_min_minutes")]
    pub prompt_min_minutes: u32,
    /// Upper bound of the random prompt interval, in minutes.
    #[serde(default = "default_prompt_max_minutes")]
    pub prompt_max_minutes: u32,
    /// Gap between the primary and secondary prompt, in seconds.
    #[serde(default = "default_micro_break_seconds")]
    pub micro_break_seconds: u32,
    #[serde(default = "default_true")]
    pub show_status_bar_icon: bool,
}

// Default functions
fn default_work_minutes() -> u32 {
    90
}
fn default_break_minutes() -> u32 {
    20
}
fn default_prompt_min_minutes() -> u32 {
    3
}
fn default_prompt_max_minutes() -> u32 {
    5
}
fn default_micro_break_seconds() -> u32 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            prompt_sound_enabled: true,
            prompt_min_minutes: default_prompt_min_minutes(),
            prompt_max_minutes: default_prompt_max_minutes(),
            micro_break_seconds: default_micro_break_seconds(),
            show_status_bar_icon: true,
        }
    }
}

impl TimerSettings {
    /// Check the invariants individual fields cannot express: all durations
    /// at least 1, and the prompt interval bounds ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(key: &str, value: u32) -> Result<(), ConfigError> {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must be at least 1".into(),
                });
            }
            Ok(())
        }
        positive("work_minutes", self.work_minutes)?;
        positive("break_minutes", self.break_minutes)?;
        positive("prompt_min_minutes", self.prompt_min_minutes)?;
        positive("prompt_max_minutes", self.prompt_max_minutes)?;
        positive("micro_break_seconds", self.micro_break_seconds)?;
        if self.prompt_min_minutes > self.prompt_max_minutes {
            return Err(ConfigError::InvalidValue {
                key: "prompt_min_minutes".into(),
                message: format!(
                    "lower bound {} exceeds upper bound {}",
                    self.prompt_min_minutes, self.prompt_max_minutes
                ),
            });
        }
        Ok(())
    }

    /// Prompt-cycle bounds in seconds.
    pub fn prompt_window(&self) -> PromptWindow {
        PromptWindow {
            min_secs: self.prompt_min_minutes * 60,
            max_secs: self.prompt_max_minutes * 60,
            micro_break_secs: self.micro_break_seconds,
        }
    }

    /// Get a settings value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by key, coercing the string to the field's type.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting settings fail validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                let parsed = value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("cannot parse '{value}' as bool"),
                })?;
                serde_json::Value::Bool(parsed)
            }
            serde_json::Value::Number(_) => {
                let parsed = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("cannot parse '{value}' as number"),
                })?;
                serde_json::Value::Number(parsed.into())
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(key.to_string(), new_value);
        let updated: TimerSettings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.into(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

/// Durable home for [`TimerSettings`].
pub trait SettingsStore: Send {
    /// Load persisted settings.
    fn load(&self) -> Result<TimerSettings, ConfigError>;
    /// Persist the given settings.
    fn save(&self, settings: &TimerSettings) -> Result<(), ConfigError>;
}

/// TOML file store.
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    /// Open the store at `<data_dir>/settings.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("settings.toml"),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: dir.join("settings.toml"),
        })
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> TimerSettings {
        match self.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                TimerSettings::default()
            }
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<TimerSettings, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let settings: TimerSettings =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                settings.validate()?;
                Ok(settings)
            }
            Err(_) => {
                let settings = TimerSettings::default();
                self.save(&settings)?;
                Ok(settings)
            }
        }
    }

    fn save(&self, settings: &TimerSettings) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(settings).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// In-memory store for tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    saved: Mutex<Option<TimerSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<TimerSettings, ConfigError> {
        let saved = self
            .saved
            .lock()
            .map_err(|_| ConfigError::ParseFailed("settings store poisoned".into()))?;
        Ok(saved.clone().unwrap_or_default())
    }

    fn save(&self, settings: &TimerSettings) -> Result<(), ConfigError> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(settings.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = TimerSettings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: TimerSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn default_values() {
        let settings = TimerSettings::default();
        assert_eq!(settings.work_minutes, 90);
        assert_eq!(settings.break_minutes, 20);
        assert!(settings.prompt_sound_enabled);
        assert_eq!(settings.prompt_min_minutes, 3);
        assert_eq!(settings.prompt_max_minutes, 5);
        assert_eq!(settings.micro_break_seconds, 10);
        assert!(settings.show_status_bar_icon);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: TimerSettings = toml::from_str("work_minutes = 50").unwrap();
        assert_eq!(parsed.work_minutes, 50);
        assert_eq!(parsed.break_minutes, 20);
        assert!(parsed.prompt_sound_enabled);
    }

    #[test]
    fn get_returns_string_for_all_types() {
        let settings = TimerSettings::default();
        assert_eq!(settings.get("work_minutes").as_deref(), Some("90"));
        assert_eq!(settings.get("prompt_sound_enabled").as_deref(), Some("true"));
        assert!(settings.get("missing_key").is_none());
    }

    #[test]
    fn set_coerces_and_validates() {
        let mut settings = TimerSettings::default();
        settings.set("break_minutes", "15").unwrap();
        assert_eq!(settings.break_minutes, 15);
        settings.set("prompt_sound_enabled", "false").unwrap();
        assert!(!settings.prompt_sound_enabled);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut settings = TimerSettings::default();
        assert!(settings.set("nonexistent", "1").is_err());
    }

    #[test]
    fn set_rejects_unparseable_value() {
        let mut settings = TimerSettings::default();
        assert!(settings.set("work_minutes", "ninety").is_err());
        assert_eq!(settings.work_minutes, 90);
    }

    #[test]
    fn validate_rejects_zero_durations() {
        let mut settings = TimerSettings::default();
        settings.work_minutes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_prompt_bounds() {
        let mut settings = TimerSettings::default();
        settings.prompt_min_minutes = 6;
        settings.prompt_max_minutes = 5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn set_rejects_inverted_prompt_bounds() {
        let mut settings = TimerSettings::default();
        let result = settings.set("prompt_min_minutes", "10");
        assert!(result.is_err());
        assert_eq!(settings.prompt_min_minutes, 3);
    }

    #[test]
    fn toml_store_writes_defaults_on_first_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("settings.toml"));
        let settings = store.load().unwrap();
        assert_eq!(settings, TimerSettings::default());
        assert!(dir.path().join("settings.toml").exists());
    }

    #[test]
    fn toml_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join("settings.toml"));
        let mut settings = TimerSettings::default();
        settings.work_minutes = 45;
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap().work_minutes, 45);
    }

    #[test]
    fn load_or_default_survives_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "work_minutes = \"not a number\"").unwrap();
        let store = TomlSettingsStore::new(path);
        assert_eq!(store.load_or_default(), TimerSettings::default());
    }

    #[test]
    fn load_or_default_rejects_invalid_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "prompt_min_minutes = 9\nprompt_max_minutes = 2").unwrap();
        let store = TomlSettingsStore::new(path);
        assert_eq!(store.load_or_default(), TimerSettings::default());
    }
}
