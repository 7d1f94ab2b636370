use crate::cli::FetchArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::data::DataManager;
use crate::error::Result;
use crate::render;
use platekit::core::store::PlateStore;
use std::path::Path;

pub async fn run(args: FetchArgs, config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    let data_manager = DataManager::new()?;
    let config = build_config(
        &ConfigOverrides::default(),
        config_path,
        set_values,
        &data_manager,
    )?;

    let stored = tokio::task::block_in_place(|| -> Result<_> {
        let store = PlateStore::open(&config.database_path)?;
        Ok(store.fetch_latest(&args.name)?)
    })?;

    let Some(stored) = stored else {
        println!("No data found");
        return Ok(());
    };

    println!(
        "Plate '{}' (id {}, saved {})",
        stored.plate.name(),
        stored.id,
        stored.created_at
    );
    if args.grid {
        println!("{}", render::plate_grid(&stored.plate));
    } else {
        println!("{}", render::plate_table(&stored.plate));
    }
    Ok(())
}
