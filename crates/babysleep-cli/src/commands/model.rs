use babysleep_core::DataStore;

use super::common;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = DataStore::open_default()?;
    match store.load_model()? {
        Some(model) if json => println!("{}", serde_json::to_string_pretty(&model)?),
        Some(model) => common::print_model(&model),
        None => println!("no trained model; run 'babysleep train' first"),
    }
    Ok(())
}
