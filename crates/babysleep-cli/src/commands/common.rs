//! Shared parsing and rendering helpers for the CLI commands.

use babysleep_core::{CoreError, DaySchedule, DayEntry, EventStatus, ModelParameters, NapInterval};
use chrono::{Local, NaiveDate, NaiveTime};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_time(s: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| CoreError::InvalidTime(s.to_string()))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CoreError::InvalidDate(s.to_string()))
}

/// Parse a `HH:MM-HH:MM` nap interval argument.
pub fn parse_nap(s: &str) -> Result<NapInterval, CoreError> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| CoreError::InvalidTime(s.to_string()))?;
    Ok(NapInterval::new(parse_time(start)?, parse_time(end)?))
}

pub fn format_time(t: Option<NaiveTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format minutes as `Xh Ym`.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 && mins > 0 {
        format!("{hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h")
    } else {
        format!("{mins}m")
    }
}

/// Print a schedule as a fixed-width table.
pub fn print_schedule(schedule: &DaySchedule, title: &str) {
    println!();
    println!("{title} ({})", schedule.date);
    println!("{:<8} {:>7} {:>7} {:>9} {:>10}", "Event", "Start", "End", "Duration", "Status");
    for event in &schedule.events {
        let duration = event
            .duration_minutes()
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());
        let status = match event.status {
            EventStatus::Actual => "Actual",
            EventStatus::Predicted => "Predicted",
        };
        println!(
            "{:<8} {:>7} {:>7} {:>9} {:>10}",
            event.kind.to_string(),
            format_time(event.start),
            format_time(event.end),
            duration,
            status
        );
    }
    println!();
}

/// Print recent log entries, newest first.
pub fn print_history(entries: &[&DayEntry]) {
    println!();
    println!("{:<12} {:>7} {:<30} {:>7}", "Date", "Wake", "Naps", "Night");
    for entry in entries {
        let naps = entry
            .naps
            .iter()
            .map(|n| format!("{}-{}", n.start.format("%H:%M"), n.end.format("%H:%M")))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<12} {:>7} {:<30} {:>7}",
            entry.date.to_string(),
            format_time(entry.wake_time),
            if naps.is_empty() { "-".to_string() } else { naps },
            format_time(entry.night_start),
        );
    }
    println!();
}

/// Print trained model parameters.
pub fn print_model(model: &ModelParameters) {
    println!();
    println!("Model trained on {} day(s)", model.days_count);
    if let Some(date) = model.trained_on {
        println!("Trained: {date}");
    }
    for i in 1..=model.max_index() {
        println!(
            "Nap {i}: wake window {}, duration {}",
            format_duration(model.wake_window(i).unwrap_or(0)),
            format_duration(model.nap_duration(i).unwrap_or(0)),
        );
    }
    println!("Night window: {}", format_duration(model.night_window_minutes));
    println!();
}
