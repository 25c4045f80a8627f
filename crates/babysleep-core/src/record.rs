//! Observed sleep records.
//!
//! A [`HistoricalRecord`] is one completed day: morning wake time, an
//! ordered list of naps, and bedtime. Records are what the trainer
//! aggregates and what the sleep log persists.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Whole minutes from `from` to `to`, normalized so that a span crossing
/// midnight never comes out negative.
pub(crate) fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    let diff = (to - from).num_minutes();
    if diff < 0 {
        diff + 24 * 60
    } else {
        diff
    }
}

/// One observed nap interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl NapInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Nap length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }
}

/// One completed day of observed sleep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub date: NaiveDate,
    pub wake_time: NaiveTime,
    /// Chronological, non-overlapping; may be empty.
    pub naps: Vec<NapInterval>,
    /// Bedtime, strictly after the last nap's end.
    pub night_start: NaiveTime,
}

impl HistoricalRecord {
    pub fn new(
        date: NaiveDate,
        wake_time: NaiveTime,
        naps: Vec<NapInterval>,
        night_start: NaiveTime,
    ) -> Self {
        Self {
            date,
            wake_time,
            naps,
            night_start,
        }
    }

    /// End of the last nap, or the wake time for a zero-nap day.
    pub fn last_rest_end(&self) -> NaiveTime {
        self.naps.last().map(|n| n.end).unwrap_or(self.wake_time)
    }

    /// Enforce the monotonic invariant: every time in the record is
    /// strictly after the previous one.
    pub fn validate(&self) -> Result<()> {
        let mut prev = self.wake_time;
        let mut prev_label = "wake time";
        for (i, nap) in self.naps.iter().enumerate() {
            if nap.start <= prev {
                return Err(self.order_error(i + 1, "start", prev_label));
            }
            if nap.end <= nap.start {
                return Err(self.order_error(i + 1, "end", "its own start"));
            }
            prev = nap.end;
            prev_label = "previous nap end";
        }
        if self.night_start <= prev {
            return Err(CoreError::InvalidRecord {
                date: self.date.to_string(),
                message: format!("night start {} is not after {}", self.night_start, prev_label),
            });
        }
        Ok(())
    }

    fn order_error(&self, nap: usize, field: &str, boundary: &str) -> CoreError {
        CoreError::InvalidRecord {
            date: self.date.to_string(),
            message: format!("nap {nap} {field} is not after {boundary}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(naps: &[(NaiveTime, NaiveTime)], night: NaiveTime) -> HistoricalRecord {
        HistoricalRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            t(7, 0),
            naps.iter().map(|&(s, e)| NapInterval::new(s, e)).collect(),
            night,
        )
    }

    #[test]
    fn test_minutes_between_same_day() {
        assert_eq!(minutes_between(t(7, 0), t(9, 30)), 150);
    }

    #[test]
    fn test_minutes_between_across_midnight() {
        assert_eq!(minutes_between(t(19, 0), t(6, 0)), 660);
    }

    #[test]
    fn test_valid_record() {
        let r = record(&[(t(9, 30), t(10, 45)), (t(14, 30), t(16, 0))], t(19, 0));
        assert!(r.validate().is_ok());
        assert_eq!(r.last_rest_end(), t(16, 0));
    }

    #[test]
    fn test_zero_nap_record_is_valid() {
        let r = record(&[], t(19, 0));
        assert!(r.validate().is_ok());
        assert_eq!(r.last_rest_end(), t(7, 0));
    }

    #[test]
    fn test_overlapping_naps_rejected() {
        let r = record(&[(t(9, 30), t(10, 45)), (t(10, 30), t(11, 30))], t(19, 0));
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_night_before_last_nap_rejected() {
        let r = record(&[(t(9, 30), t(10, 45))], t(10, 0));
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_nap_duration() {
        let nap = NapInterval::new(t(9, 30), t(10, 45));
        assert_eq!(nap.duration_minutes(), 75);
    }
}
