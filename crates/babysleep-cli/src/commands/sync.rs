use babysleep_core::calendar::{plan_sync, CalendarClient, SyncAuth};
use babysleep_core::{Config, DataStore};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::open_default()?;
    let config = Config::load_or_default(store.dir());

    let mut stored = store
        .load_schedule()?
        .ok_or("no schedule yet; run 'babysleep predict <wake_time>' first")?;

    let entries = plan_sync(
        &stored.schedule,
        &config.calendar,
        &config.baby_name,
        &stored.calendar_event_ids,
    );
    if entries.is_empty() {
        println!("nothing to sync");
        return Ok(());
    }

    let auth = SyncAuth::load(store.dir())?;
    let mut client = CalendarClient::new(
        auth,
        config.calendar.calendar_id.clone(),
        config.calendar.timezone.clone(),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let mut synced = 0;
    for entry in &entries {
        let event_id = runtime.block_on(client.upsert_event(entry))?;
        stored.calendar_event_ids.insert(entry.key.clone(), event_id);
        synced += 1;
    }
    store.save_schedule(&stored)?;

    println!("synced {synced} event(s) to calendar '{}'", config.calendar.calendar_id);
    Ok(())
}
