//! File-backed persistence.
//!
//! Every command invocation loads state from the data directory, performs
//! one core call, and writes the result back. There is no live shared
//! state between invocations, only these files.

mod config;
mod sleep_log;
mod store;

pub use config::{CalendarConfig, Config};
pub use sleep_log::{DayEntry, SleepLog};
pub use store::{DataStore, StoredSchedule};

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Returns `~/.config/babysleep[-dev]/` based on BABYSLEEP_ENV.
///
/// Set BABYSLEEP_ENV=dev to use a development data directory, or
/// BABYSLEEP_DATA_DIR to point at an explicit directory (E2E tests).
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(explicit) = std::env::var("BABYSLEEP_DATA_DIR") {
        PathBuf::from(explicit)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("BABYSLEEP_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("babysleep-dev")
        } else {
            base_dir.join("babysleep")
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
