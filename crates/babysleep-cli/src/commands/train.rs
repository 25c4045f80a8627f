use babysleep_core::{model, DataStore};

use super::common;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::open_default()?;
    let log = store.load_sleep_log()?;

    // Today is usually still in progress; train on completed days only.
    let records = log.historical_records(Some(common::today()));
    let mut trained = model::train(&records)?;
    trained.trained_on = Some(common::today());
    store.save_model(&trained)?;

    println!("model trained on {} day(s)", trained.days_count);
    common::print_model(&trained);
    Ok(())
}
