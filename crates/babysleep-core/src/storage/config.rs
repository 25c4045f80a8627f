//! TOML-based application configuration.
//!
//! Stored at `<data dir>/config.toml`. Holds display and calendar-sync
//! preferences; nothing here affects the model or the engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

const CONFIG_FILE: &str = "config.toml";

/// Calendar-sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Target calendar; "primary" is the account's default calendar.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// Length of the night event on the calendar, in minutes. The
    /// schedule itself never carries a night end; this is rendering only.
    #[serde(default = "default_night_event_minutes")]
    pub night_event_minutes: i64,
    /// IANA timezone attached to synced events.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            night_event_minutes: default_night_event_minutes(),
            timezone: default_timezone(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_baby_name")]
    pub baby_name: String,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baby_name: default_baby_name(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Config {
    /// Load the config from `dir`, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| toml::from_str(&contents).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let contents = toml::to_string_pretty(self).map_err(|e| StorageError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, contents).map_err(|e| StorageError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn default_baby_name() -> String {
    "Baby".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_night_event_minutes() -> i64 {
    660
}

fn default_timezone() -> String {
    "UTC".to_string()
}
