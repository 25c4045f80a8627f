use babysleep_core::DataStore;

use super::common;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::open_default()?;
    match store.load_schedule()? {
        Some(stored) if json => println!("{}", serde_json::to_string_pretty(&stored.schedule)?),
        Some(stored) => common::print_schedule(&stored.schedule, "Current schedule"),
        None => println!("no schedule yet; run 'babysleep predict <wake_time>' first"),
    }
    Ok(())
}
