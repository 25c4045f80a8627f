//! Pattern-learning model trainer.
//!
//! Turns a variable-length history of daily sleep records into fixed
//! per-position parameters: one wake window and one nap duration per nap
//! index, plus a single night window. Days with fewer naps simply
//! contribute samples to fewer indices, so aggregation runs over a map
//! from nap index to sample list rather than fixed-width rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::record::{minutes_between, HistoricalRecord};

/// Learned per-position sleep parameters, in whole minutes.
///
/// Index 0 of `wake_windows` / `nap_durations` corresponds to nap 1.
/// Immutable once produced; the schedule engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Minutes from the previous rest's end (or wake time) to each nap's start.
    pub wake_windows: Vec<i64>,
    /// Minutes each nap lasts.
    pub nap_durations: Vec<i64>,
    /// Minutes from the last nap's end (or wake time) to bedtime.
    pub night_window_minutes: i64,
    /// Date the model was trained, for display only.
    #[serde(default)]
    pub trained_on: Option<NaiveDate>,
    /// Number of records the model was trained on.
    #[serde(default)]
    pub days_count: usize,
}

impl ModelParameters {
    /// Highest supported nap index (naps are numbered 1..=max_index).
    pub fn max_index(&self) -> usize {
        self.wake_windows.len()
    }

    /// Whether the model supports at least one nap index.
    pub fn is_trained(&self) -> bool {
        !self.wake_windows.is_empty()
    }

    /// Wake window for 1-based nap index `i`.
    pub fn wake_window(&self, i: usize) -> Option<i64> {
        self.wake_windows.get(i.checked_sub(1)?).copied()
    }

    /// Nap duration for 1-based nap index `i`.
    pub fn nap_duration(&self, i: usize) -> Option<i64> {
        self.nap_durations.get(i.checked_sub(1)?).copied()
    }
}

fn mean_minutes(samples: &[i64]) -> i64 {
    let sum: i64 = samples.iter().sum();
    (sum as f64 / samples.len() as f64).round() as i64
}

/// Train model parameters on a set of historical records.
///
/// Pure and order-independent: the result depends only on the multiset of
/// records. Fails with [`CoreError::InsufficientData`] when `records` is
/// empty. An index with zero samples terminates the supported range, so
/// no prediction is ever generated past the first unsupported nap.
pub fn train(records: &[HistoricalRecord]) -> Result<ModelParameters> {
    if records.is_empty() {
        return Err(CoreError::InsufficientData);
    }

    let mut window_samples: BTreeMap<usize, Vec<i64>> = BTreeMap::new();
    let mut duration_samples: BTreeMap<usize, Vec<i64>> = BTreeMap::new();
    let mut night_samples: Vec<i64> = Vec::with_capacity(records.len());

    for record in records {
        let mut prev_boundary = record.wake_time;
        for (idx, nap) in record.naps.iter().enumerate() {
            let i = idx + 1;
            window_samples
                .entry(i)
                .or_default()
                .push(minutes_between(prev_boundary, nap.start));
            duration_samples
                .entry(i)
                .or_default()
                .push(nap.duration_minutes());
            prev_boundary = nap.end;
        }
        night_samples.push(minutes_between(record.last_rest_end(), record.night_start));
    }

    let mut wake_windows = Vec::new();
    let mut nap_durations = Vec::new();
    for i in 1.. {
        match (window_samples.get(&i), duration_samples.get(&i)) {
            (Some(windows), Some(durations)) if !windows.is_empty() => {
                wake_windows.push(mean_minutes(windows));
                nap_durations.push(mean_minutes(durations));
            }
            _ => break,
        }
    }

    Ok(ModelParameters {
        wake_windows,
        nap_durations,
        night_window_minutes: mean_minutes(&night_samples),
        trained_on: None,
        days_count: records.len(),
    })
}
