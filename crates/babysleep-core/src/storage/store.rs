//! JSON file stores for the sleep log, trained model, and current
//! schedule.
//!
//! One [`DataStore`] wraps the data directory; each value lives in its own
//! file and is rewritten wholesale on save.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::sleep_log::SleepLog;
use crate::engine::DaySchedule;
use crate::error::{Result, StorageError};
use crate::model::ModelParameters;

const SLEEP_LOG_FILE: &str = "sleep_log.json";
const MODEL_FILE: &str = "model.json";
const SCHEDULE_FILE: &str = "schedule.json";

/// The current schedule together with the calendar event ids created for
/// it, so a later sync updates entries in place instead of duplicating
/// them. Keys are event identifiers (`nap 1`, `night`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSchedule {
    pub schedule: DaySchedule,
    #[serde(default)]
    pub calendar_event_ids: BTreeMap<String, String>,
}

impl StoredSchedule {
    pub fn new(schedule: DaySchedule) -> Self {
        Self {
            schedule,
            calendar_event_ids: BTreeMap::new(),
        }
    }
}

/// File-backed store rooted at a data directory.
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    /// Store rooted at the default data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(super::data_dir()?))
    }

    /// Store rooted at an explicit directory (tests use a temp dir).
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the sleep log, or an empty one when none exists yet.
    pub fn load_sleep_log(&self) -> Result<SleepLog> {
        Ok(self.read_json(SLEEP_LOG_FILE)?.unwrap_or_default())
    }

    pub fn save_sleep_log(&self, log: &SleepLog) -> Result<()> {
        self.write_json(SLEEP_LOG_FILE, log)
    }

    /// Load the trained model; `None` means training has never run.
    pub fn load_model(&self) -> Result<Option<ModelParameters>> {
        self.read_json(MODEL_FILE)
    }

    pub fn save_model(&self, model: &ModelParameters) -> Result<()> {
        self.write_json(MODEL_FILE, model)
    }

    /// Load the current schedule; `None` means nothing predicted yet.
    pub fn load_schedule(&self) -> Result<Option<StoredSchedule>> {
        self.read_json(SCHEDULE_FILE)
    }

    pub fn save_schedule(&self, stored: &StoredSchedule) -> Result<()> {
        self.write_json(SCHEDULE_FILE, stored)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| StorageError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let value = serde_json::from_str(&contents).map_err(|e| StorageError::LoadFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json).map_err(|e| StorageError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EventKind, EventStatus, ScheduledEvent};
    use chrono::{NaiveDate, NaiveTime};

    fn schedule() -> DaySchedule {
        DaySchedule {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            events: vec![ScheduledEvent {
                kind: EventKind::Wake,
                start: NaiveTime::from_hms_opt(7, 0, 0),
                end: None,
                status: EventStatus::Actual,
            }],
        }
    }

    #[test]
    fn test_missing_files_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::at(dir.path());

        assert_eq!(store.load_sleep_log().unwrap(), SleepLog::default());
        assert!(store.load_model().unwrap().is_none());
        assert!(store.load_schedule().unwrap().is_none());
    }

    #[test]
    fn test_model_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::at(dir.path());
        let model = ModelParameters {
            wake_windows: vec![150, 225],
            nap_durations: vec![75, 90],
            night_window_minutes: 156,
            trained_on: NaiveDate::from_ymd_opt(2025, 1, 15),
            days_count: 4,
        };

        store.save_model(&model).unwrap();
        assert_eq!(store.load_model().unwrap(), Some(model));
    }

    #[test]
    fn test_schedule_round_trip_keeps_event_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::at(dir.path());

        let mut stored = StoredSchedule::new(schedule());
        stored
            .calendar_event_ids
            .insert("nap 1".to_string(), "evt-123".to_string());

        store.save_schedule(&stored).unwrap();
        assert_eq!(store.load_schedule().unwrap(), Some(stored));
    }

    #[test]
    fn test_corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.json"), "not json").unwrap();

        let store = DataStore::at(dir.path());
        assert!(store.load_model().is_err());
    }
}
