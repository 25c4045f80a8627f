use babysleep_core::DataStore;

use super::common;

pub fn run(days: usize) -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::open_default()?;
    let log = store.load_sleep_log()?;

    let recent = log.recent(days);
    if recent.is_empty() {
        println!("no history yet; use 'babysleep add <date>' to record days");
        return Ok(());
    }
    common::print_history(&recent);
    Ok(())
}
