use babysleep_core::{
    CoreError, DataStore, DaySchedule, EventKind, EventStatus, NapInterval, ScheduleEngine,
    SleepLog,
};

use super::common;

pub fn run(target: &str, start: &str, end: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let kind = EventKind::parse(target)
        .ok_or("TARGET must be 'wake', a nap number, or 'night'")?;
    let actual_start = common::parse_time(start)?;
    let actual_end = end.map(common::parse_time).transpose()?;

    let store = DataStore::open_default()?;
    let mut stored = store
        .load_schedule()?
        .ok_or("no schedule yet; run 'babysleep predict <wake_time>' first")?;
    let model = store.load_model()?.ok_or(CoreError::ModelNotTrained)?;

    ScheduleEngine::new(&model).correct(&mut stored.schedule, kind, actual_start, actual_end)?;
    store.save_schedule(&stored)?;

    let mut log = store.load_sleep_log()?;
    record_actuals(&mut log, &stored.schedule);
    store.save_sleep_log(&log)?;

    match actual_end {
        Some(end) => println!("{kind} updated: {}-{}", actual_start.format("%H:%M"), end.format("%H:%M")),
        None => println!("{kind} started: {}", actual_start.format("%H:%M")),
    }
    common::print_schedule(&stored.schedule, "Updated schedule");
    Ok(())
}

/// Mirror confirmed events into the day's log entry, so that today
/// gradually becomes a complete historical record.
fn record_actuals(log: &mut SleepLog, schedule: &DaySchedule) {
    let entry = log.day_mut(schedule.date);
    let mut naps = Vec::new();
    for event in &schedule.events {
        if event.status != EventStatus::Actual {
            continue;
        }
        match event.kind {
            EventKind::Wake => entry.wake_time = event.start,
            EventKind::Nap(_) => {
                if let (Some(start), Some(end)) = (event.start, event.end) {
                    naps.push(NapInterval::new(start, end));
                }
            }
            EventKind::Night => entry.night_start = event.start,
        }
    }
    entry.naps = naps;
}
