use babysleep_core::{DataStore, DayEntry, HistoricalRecord};

use super::common;

pub fn run(date: &str, wake: &str, naps: &[String], night: &str) -> Result<(), Box<dyn std::error::Error>> {
    let date = common::parse_date(date)?;
    let wake = common::parse_time(wake)?;
    let night = common::parse_time(night)?;
    let naps = naps
        .iter()
        .map(|n| common::parse_nap(n))
        .collect::<Result<Vec<_>, _>>()?;

    let record = HistoricalRecord::new(date, wake, naps, night);
    record.validate()?;

    let store = DataStore::open_default()?;
    let mut log = store.load_sleep_log()?;
    log.upsert_day(DayEntry::from(record));
    store.save_sleep_log(&log)?;

    println!("added sleep data for {date}");
    Ok(())
}
