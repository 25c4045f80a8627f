//! The sleep log: every day the user has recorded or predicted.
//!
//! A [`DayEntry`] may be partial (today usually has a wake time long
//! before it has a bedtime); only complete entries become training
//! records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::record::{HistoricalRecord, NapInterval};

/// One day in the log, possibly still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub wake_time: Option<NaiveTime>,
    #[serde(default)]
    pub naps: Vec<NapInterval>,
    #[serde(default)]
    pub night_start: Option<NaiveTime>,
}

impl DayEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            wake_time: None,
            naps: Vec::new(),
            night_start: None,
        }
    }

    /// A complete entry has both a wake time and a bedtime; naps may be
    /// empty.
    pub fn as_record(&self) -> Option<HistoricalRecord> {
        Some(HistoricalRecord::new(
            self.date,
            self.wake_time?,
            self.naps.clone(),
            self.night_start?,
        ))
    }
}

impl From<HistoricalRecord> for DayEntry {
    fn from(record: HistoricalRecord) -> Self {
        Self {
            date: record.date,
            wake_time: Some(record.wake_time),
            naps: record.naps,
            night_start: Some(record.night_start),
        }
    }
}

/// The full record set, kept sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepLog {
    #[serde(default)]
    pub days: Vec<DayEntry>,
}

impl SleepLog {
    pub fn day(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Fetch or create the entry for `date`.
    pub fn day_mut(&mut self, date: NaiveDate) -> &mut DayEntry {
        let idx = match self.days.iter().position(|d| d.date == date) {
            Some(idx) => idx,
            None => {
                let idx = self.days.partition_point(|d| d.date < date);
                self.days.insert(idx, DayEntry::new(date));
                idx
            }
        };
        &mut self.days[idx]
    }

    /// Insert or replace the entry for the entry's date.
    pub fn upsert_day(&mut self, entry: DayEntry) {
        self.days.retain(|d| d.date != entry.date);
        self.days.push(entry);
        self.days.sort_by_key(|d| d.date);
    }

    /// Completed days usable for training, optionally excluding one date
    /// (typically today, which is still in progress).
    pub fn historical_records(&self, exclude: Option<NaiveDate>) -> Vec<HistoricalRecord> {
        self.days
            .iter()
            .filter(|d| exclude != Some(d.date))
            .filter_map(|d| d.as_record())
            .collect()
    }

    /// The most recent `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&DayEntry> {
        self.days.iter().rev().take(limit).collect()
    }
}
