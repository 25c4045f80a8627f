//! Calendar synchronization.
//!
//! The calendar is a consumer of the schedule's final event list: each nap
//! maps to one calendar entry and the night to another. Entry ids are
//! stored with the schedule so subsequent syncs update in place instead of
//! duplicating. Planning is pure ([`plan_sync`]); the HTTP side lives in
//! [`client`].

mod client;

pub use client::{CalendarClient, SyncAuth};

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::engine::{DaySchedule, EventKind, EventStatus};
use crate::storage::CalendarConfig;

// Google Calendar colorIds: 5 = yellow (naps), 9 = blue (night).
const COLOR_NAP: &str = "5";
const COLOR_NIGHT: &str = "9";

/// One calendar entry to create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
    /// Event identifier within the schedule (`nap 1`, `night`).
    pub key: String,
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color_id: &'static str,
    /// Calendar id from a previous sync; set means update in place.
    pub existing_id: Option<String>,
}

/// Map a schedule to the calendar entries it should produce.
///
/// Naps need both times to be rendered; an open-ended in-progress nap is
/// skipped until its end is corrected. The night entry's end is the
/// configured duration past its start, possibly on the next calendar day.
pub fn plan_sync(
    schedule: &DaySchedule,
    config: &CalendarConfig,
    baby_name: &str,
    existing_ids: &BTreeMap<String, String>,
) -> Vec<SyncEntry> {
    let mut entries = Vec::new();

    for event in &schedule.events {
        let key = event.kind.to_string();
        let status = match event.status {
            EventStatus::Actual => "actual",
            EventStatus::Predicted => "predicted",
        };
        let entry = match event.kind {
            EventKind::Wake => None,
            EventKind::Nap(i) => match (event.start, event.end) {
                (Some(start), Some(end)) => Some(SyncEntry {
                    key: key.clone(),
                    summary: format!("{baby_name} nap {i}"),
                    description: format!("Nap {i} ({status})"),
                    start: schedule.date.and_time(start),
                    end: schedule.date.and_time(end),
                    color_id: COLOR_NAP,
                    existing_id: existing_ids.get(&key).cloned(),
                }),
                _ => None,
            },
            EventKind::Night => event.start.map(|start| {
                let start = schedule.date.and_time(start);
                SyncEntry {
                    key: key.clone(),
                    summary: format!("{baby_name} night sleep"),
                    description: format!("Night sleep ({status})"),
                    start,
                    end: start + Duration::minutes(config.night_event_minutes),
                    color_id: COLOR_NIGHT,
                    existing_id: existing_ids.get(&key).cloned(),
                }
            }),
        };
        entries.extend(entry);
    }

    entries
}
