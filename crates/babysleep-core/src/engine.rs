//! Schedule prediction and correction engine.
//!
//! A [`DaySchedule`] is an ordered chain Wake, Nap(1)..Nap(k), Night where
//! each event's time depends only on the previous event's anchor. The
//! engine builds the chain from a morning wake time and re-derives the
//! tail of the chain whenever the user corrects an event. Recomputation is
//! a single forward pass over the events after the corrected one; events
//! before it are never touched.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::ModelParameters;

/// Identity of an event within a day, ordered by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Wake,
    Nap(usize),
    Night,
}

impl EventKind {
    /// Parse a CLI identifier: `wake`, `night`, or a 1-based nap number.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wake" => Some(EventKind::Wake),
            "night" => Some(EventKind::Night),
            other => other.parse::<usize>().ok().filter(|&i| i >= 1).map(EventKind::Nap),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Wake => write!(f, "wake"),
            EventKind::Nap(i) => write!(f, "nap {i}"),
            EventKind::Night => write!(f, "night"),
        }
    }
}

/// Whether an event's times are user-confirmed or model-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Actual,
    Predicted,
}

/// One event in a day's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub kind: EventKind,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub status: EventStatus,
}

impl ScheduledEvent {
    /// The time downstream predictions chain from: the event's end, or its
    /// start while the event is still open-ended.
    pub fn anchor(&self) -> Option<NaiveTime> {
        self.end.or(self.start)
    }

    /// Event length in whole minutes, when both times are set.
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some(crate::record::minutes_between(s, e)),
            _ => None,
        }
    }
}

/// One day's working schedule: the ordered event chain the engine builds
/// and revises. Persisted between commands and replaced wholesale by the
/// next day's prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub events: Vec<ScheduledEvent>,
}

impl DaySchedule {
    /// Position of `kind` in the event chain.
    pub fn position(&self, kind: EventKind) -> Option<usize> {
        self.events.iter().position(|e| e.kind == kind)
    }

    /// Look up an event by kind.
    pub fn event(&self, kind: EventKind) -> Option<&ScheduledEvent> {
        self.events.iter().find(|e| e.kind == kind)
    }

    /// Identifiers of every event in the chain, for error messages.
    pub fn valid_identifiers(&self) -> Vec<String> {
        self.events.iter().map(|e| e.kind.to_string()).collect()
    }
}

/// Prediction/correction engine over a trained model.
pub struct ScheduleEngine<'a> {
    model: &'a ModelParameters,
}

impl<'a> ScheduleEngine<'a> {
    pub fn new(model: &'a ModelParameters) -> Self {
        Self { model }
    }

    /// Build a fresh schedule for `date` from a morning wake time.
    ///
    /// Deterministic, total function of (wake_time, model). Fails with
    /// [`CoreError::ModelNotTrained`] when the model supports no nap index.
    pub fn predict(&self, date: NaiveDate, wake_time: NaiveTime) -> Result<DaySchedule> {
        if !self.model.is_trained() {
            return Err(CoreError::ModelNotTrained);
        }

        let mut events = vec![ScheduledEvent {
            kind: EventKind::Wake,
            start: Some(wake_time),
            end: None,
            status: EventStatus::Actual,
        }];

        let mut anchor = wake_time;
        for i in 1..=self.model.max_index() {
            // Indices 1..=max_index are supported by construction.
            let window = self.model.wake_window(i).unwrap_or(0);
            let duration = self.model.nap_duration(i).unwrap_or(0);
            let start = anchor + Duration::minutes(window);
            let end = start + Duration::minutes(duration);
            events.push(ScheduledEvent {
                kind: EventKind::Nap(i),
                start: Some(start),
                end: Some(end),
                status: EventStatus::Predicted,
            });
            anchor = end;
        }

        events.push(ScheduledEvent {
            kind: EventKind::Night,
            start: Some(anchor + Duration::minutes(self.model.night_window_minutes)),
            // Night end falls on the next calendar day, out of this
            // schedule's scope.
            end: None,
            status: EventStatus::Predicted,
        });

        Ok(DaySchedule { date, events })
    }

    /// Apply a user correction to one event and re-derive everything after
    /// it.
    ///
    /// The corrected event becomes `Actual`; every later event is
    /// unconditionally recomputed from the model, anchored at the corrected
    /// event's end (or its start when no end was given, treating the
    /// open-ended event as if it ended instantly). Downstream events that
    /// were themselves `Actual` from an earlier correction are overwritten
    /// back to `Predicted`. Idempotent for identical arguments.
    pub fn correct(
        &self,
        schedule: &mut DaySchedule,
        target: EventKind,
        actual_start: NaiveTime,
        actual_end: Option<NaiveTime>,
    ) -> Result<()> {
        let pos = schedule.position(target).ok_or_else(|| CoreError::UnknownEvent {
            target: target.to_string(),
            valid: schedule.valid_identifiers(),
        })?;

        // Validate everything before mutating: no partial updates.
        if let Some(end) = actual_end {
            if end < actual_start {
                return Err(CoreError::InvalidTimeOrder {
                    event: target.to_string(),
                    start: end,
                    boundary: actual_start,
                });
            }
        }
        if let Some(boundary) = schedule.events[..pos]
            .iter()
            .rev()
            .find(|e| e.status == EventStatus::Actual)
            .and_then(|e| e.anchor())
        {
            if actual_start < boundary {
                return Err(CoreError::InvalidTimeOrder {
                    event: target.to_string(),
                    start: actual_start,
                    boundary,
                });
            }
        }
        // A schedule can outlive a retrain that shrank the supported nap
        // range; refuse to recompute naps the model no longer covers.
        for event in &schedule.events[pos + 1..] {
            if let EventKind::Nap(i) = event.kind {
                if self.model.wake_window(i).is_none() {
                    return Err(CoreError::ModelNotTrained);
                }
            }
        }

        let event = &mut schedule.events[pos];
        event.start = Some(actual_start);
        event.end = actual_end;
        event.status = EventStatus::Actual;

        let mut anchor = actual_end.unwrap_or(actual_start);
        for event in &mut schedule.events[pos + 1..] {
            match event.kind {
                EventKind::Nap(i) => {
                    let start = anchor + Duration::minutes(self.model.wake_window(i).unwrap_or(0));
                    let end = start + Duration::minutes(self.model.nap_duration(i).unwrap_or(0));
                    event.start = Some(start);
                    event.end = Some(end);
                    event.status = EventStatus::Predicted;
                    anchor = end;
                }
                EventKind::Night => {
                    event.start = Some(anchor + Duration::minutes(self.model.night_window_minutes));
                    event.end = None;
                    event.status = EventStatus::Predicted;
                }
                EventKind::Wake => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    /// Model from the worked example: wake windows 2h30m/3h45m, naps
    /// 1h15m/1h30m, night window 2h36m.
    fn model() -> ModelParameters {
        ModelParameters {
            wake_windows: vec![150, 225],
            nap_durations: vec![75, 90],
            night_window_minutes: 156,
            trained_on: None,
            days_count: 4,
        }
    }

    fn untrained() -> ModelParameters {
        ModelParameters {
            wake_windows: vec![],
            nap_durations: vec![],
            night_window_minutes: 120,
            trained_on: None,
            days_count: 0,
        }
    }

    fn event(s: &DaySchedule, kind: EventKind) -> ScheduledEvent {
        *s.event(kind).unwrap()
    }

    #[test]
    fn test_predict_worked_example() {
        let m = model();
        let schedule = ScheduleEngine::new(&m).predict(date(), t(7, 0)).unwrap();

        let wake = event(&schedule, EventKind::Wake);
        assert_eq!(wake.start, Some(t(7, 0)));
        assert_eq!(wake.status, EventStatus::Actual);

        let nap1 = event(&schedule, EventKind::Nap(1));
        assert_eq!((nap1.start, nap1.end), (Some(t(9, 30)), Some(t(10, 45))));
        assert_eq!(nap1.status, EventStatus::Predicted);

        let nap2 = event(&schedule, EventKind::Nap(2));
        assert_eq!((nap2.start, nap2.end), (Some(t(14, 30)), Some(t(16, 0))));

        let night = event(&schedule, EventKind::Night);
        assert_eq!(night.start, Some(t(18, 36)));
        assert_eq!(night.end, None);
        assert_eq!(night.status, EventStatus::Predicted);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        assert_eq!(
            engine.predict(date(), t(7, 0)).unwrap(),
            engine.predict(date(), t(7, 0)).unwrap()
        );
    }

    #[test]
    fn test_predict_untrained_model_rejected() {
        let m = untrained();
        assert!(matches!(
            ScheduleEngine::new(&m).predict(date(), t(7, 0)),
            Err(CoreError::ModelNotTrained)
        ));
    }

    #[test]
    fn test_correct_shorter_nap_recomputes_tail() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 30), Some(t(10, 30)))
            .unwrap();

        let nap1 = event(&schedule, EventKind::Nap(1));
        assert_eq!((nap1.start, nap1.end), (Some(t(9, 30)), Some(t(10, 30))));
        assert_eq!(nap1.status, EventStatus::Actual);

        let nap2 = event(&schedule, EventKind::Nap(2));
        assert_eq!((nap2.start, nap2.end), (Some(t(14, 15)), Some(t(15, 45))));
        assert_eq!(nap2.status, EventStatus::Predicted);

        assert_eq!(event(&schedule, EventKind::Night).start, Some(t(18, 21)));
    }

    #[test]
    fn test_correct_night_without_end_leaves_prefix_alone() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();
        let before = schedule.clone();

        engine
            .correct(&mut schedule, EventKind::Night, t(19, 10), None)
            .unwrap();

        let night = event(&schedule, EventKind::Night);
        assert_eq!(night.start, Some(t(19, 10)));
        assert_eq!(night.end, None);
        assert_eq!(night.status, EventStatus::Actual);
        assert_eq!(schedule.events[..3], before.events[..3]);
    }

    #[test]
    fn test_correct_is_idempotent() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 0), Some(t(10, 0)))
            .unwrap();
        let once = schedule.clone();
        engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 0), Some(t(10, 0)))
            .unwrap();
        assert_eq!(schedule, once);
    }

    #[test]
    fn test_correcting_earlier_event_overwrites_later_actuals() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        engine
            .correct(&mut schedule, EventKind::Nap(2), t(14, 0), Some(t(15, 0)))
            .unwrap();
        assert_eq!(event(&schedule, EventKind::Nap(2)).status, EventStatus::Actual);

        // Correcting nap 1 afterwards re-derives nap 2 from the model;
        // the stale actual past the corrected point is not preserved.
        engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 30), Some(t(11, 0)))
            .unwrap();

        let nap2 = event(&schedule, EventKind::Nap(2));
        assert_eq!(nap2.status, EventStatus::Predicted);
        assert_eq!((nap2.start, nap2.end), (Some(t(14, 45)), Some(t(16, 15))));
        assert_eq!(event(&schedule, EventKind::Night).start, Some(t(18, 51)));
    }

    // Deliberate policy for in-progress events: a correction with a start
    // and no end anchors downstream recomputation at that start, as if the
    // event ended instantly. The alternative (assume an average duration)
    // was rejected so that a later end correction is the single source of
    // truth for the nap's length.
    #[test]
    fn test_open_ended_correction_anchors_at_start() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 45), None)
            .unwrap();

        let nap1 = event(&schedule, EventKind::Nap(1));
        assert_eq!(nap1.end, None);
        assert_eq!(nap1.status, EventStatus::Actual);

        // Nap 2 chains from 09:45 directly.
        let nap2 = event(&schedule, EventKind::Nap(2));
        assert_eq!((nap2.start, nap2.end), (Some(t(13, 30)), Some(t(15, 0))));
    }

    #[test]
    fn test_correct_wake_shifts_whole_chain() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        engine
            .correct(&mut schedule, EventKind::Wake, t(7, 30), None)
            .unwrap();

        assert_eq!(event(&schedule, EventKind::Nap(1)).start, Some(t(10, 0)));
        assert_eq!(event(&schedule, EventKind::Nap(2)).start, Some(t(15, 0)));
        assert_eq!(event(&schedule, EventKind::Night).start, Some(t(19, 6)));
    }

    #[test]
    fn test_unknown_event_lists_valid_identifiers() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        let err = engine
            .correct(&mut schedule, EventKind::Nap(5), t(9, 0), None)
            .unwrap_err();
        match err {
            CoreError::UnknownEvent { target, valid } => {
                assert_eq!(target, "nap 5");
                assert_eq!(valid, vec!["wake", "nap 1", "nap 2", "night"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_order_rejected_without_mutation() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();
        let before = schedule.clone();

        // Start before the wake anchor.
        let err = engine
            .correct(&mut schedule, EventKind::Nap(1), t(6, 30), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimeOrder { .. }));
        assert_eq!(schedule, before);

        // End before start.
        let err = engine
            .correct(&mut schedule, EventKind::Nap(1), t(9, 30), Some(t(9, 0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimeOrder { .. }));
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_order_checked_against_latest_actual_not_predictions() {
        let m = model();
        let engine = ScheduleEngine::new(&m);
        let mut schedule = engine.predict(date(), t(7, 0)).unwrap();

        // Nap 1 is still only a prediction (ends 10:45); correcting nap 2
        // to start 10:00 is accepted because the only earlier actual is
        // the 07:00 wake.
        engine
            .correct(&mut schedule, EventKind::Nap(2), t(10, 0), Some(t(11, 0)))
            .unwrap();
        assert_eq!(event(&schedule, EventKind::Nap(2)).start, Some(t(10, 0)));
    }

    proptest! {
        /// Every event starts at or after the previous event's anchor, for
        /// any model and wake time whose chain stays within one day.
        #[test]
        fn prop_chain_is_monotonic(
            windows in prop::collection::vec(30i64..=120, 1..=3),
            durations in prop::collection::vec(20i64..=90, 3),
            night in 30i64..=180,
            wake_minute in 240u32..=540,
        ) {
            let n = windows.len();
            let m = ModelParameters {
                wake_windows: windows,
                nap_durations: durations[..n].to_vec(),
                night_window_minutes: night,
                trained_on: None,
                days_count: 1,
            };
            let wake = NaiveTime::from_hms_opt(wake_minute / 60, wake_minute % 60, 0).unwrap();
            let schedule = ScheduleEngine::new(&m).predict(date(), wake).unwrap();

            for pair in schedule.events.windows(2) {
                let boundary = pair[0].anchor().unwrap();
                prop_assert!(pair[1].start.unwrap() >= boundary);
            }
        }
    }
}
