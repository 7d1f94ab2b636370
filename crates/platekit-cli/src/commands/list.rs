use crate::config::{ConfigOverrides, build_config};
use crate::data::DataManager;
use crate::error::Result;
use crate::render;
use platekit::core::store::PlateStore;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    let data_manager = DataManager::new()?;
    let config = build_config(
        &ConfigOverrides::default(),
        config_path,
        set_values,
        &data_manager,
    )?;

    let plates = tokio::task::block_in_place(|| -> Result<_> {
        let store = PlateStore::open(&config.database_path)?;
        Ok(store.list_plates()?)
    })?;

    println!("{}", render::plate_list(&plates));
    Ok(())
}
