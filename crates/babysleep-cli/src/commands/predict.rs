use babysleep_core::{CoreError, DataStore, ScheduleEngine, StoredSchedule};

use super::common;

pub fn run(wake_time: &str) -> Result<(), Box<dyn std::error::Error>> {
    let wake = common::parse_time(wake_time)?;
    let today = common::today();

    let store = DataStore::open_default()?;
    let model = store.load_model()?.ok_or(CoreError::ModelNotTrained)?;

    let schedule = ScheduleEngine::new(&model).predict(today, wake)?;

    // Keep calendar event ids when re-predicting the same day so a later
    // sync updates the existing entries.
    let mut stored = StoredSchedule::new(schedule);
    if let Some(previous) = store.load_schedule()? {
        if previous.schedule.date == today {
            stored.calendar_event_ids = previous.calendar_event_ids;
        }
    }
    store.save_schedule(&stored)?;

    let mut log = store.load_sleep_log()?;
    log.day_mut(today).wake_time = Some(wake);
    store.save_sleep_log(&log)?;

    common::print_schedule(&stored.schedule, "Predicted schedule");
    Ok(())
}
