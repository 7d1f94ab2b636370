use crate::cli::AnalyzeArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::render;
use crate::utils::progress::CliProgressHandler;
use platekit::core::store::{PlateStore, StoredPlate};
use platekit::engine::progress::ProgressReporter;
use platekit::workflows;
use std::path::Path;
use tracing::info;

pub async fn run(
    args: AnalyzeArgs,
    config_path: Option<&Path>,
    set_values: &[String],
) -> Result<()> {
    let data_manager = DataManager::new()?;
    let config = build_config(
        &ConfigOverrides::from(&args.method),
        config_path,
        set_values,
        &data_manager,
    )?;

    let (mut store, stored) = load_latest(&config.database_path, &args.name)?;
    info!(
        "Loaded plate '{}' (id {}, saved {}).",
        args.name, stored.id, stored.created_at
    );
    let mut plate = stored.plate;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Analyzing plate '{}'...", plate.name());
    let summary = tokio::task::block_in_place(|| {
        workflows::analyze::run(&mut plate, &config.classification, &reporter)
    })?;

    println!("{}", render::analysis_summary(&summary));
    if args.grid {
        println!("{}", render::plate_grid(&plate));
    } else {
        println!("{}", render::plate_table(&plate));
    }

    if args.save {
        let id = tokio::task::block_in_place(|| store.save(&plate))?;
        println!("✓ Analyzed plate saved as id {}.", id);
    }
    Ok(())
}

fn load_latest(database_path: &Path, name: &str) -> Result<(PlateStore, StoredPlate)> {
    tokio::task::block_in_place(|| -> Result<_> {
        let store = PlateStore::open(database_path)?;
        let stored = store
            .fetch_latest(name)?
            .ok_or_else(|| CliError::PlateNotFound(name.to_string()))?;
        Ok((store, stored))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use platekit::core::models::plate::PlateTable;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn load_latest_opens_and_fetches_inside_the_runtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("elisa.db");
        let mut store = PlateStore::open(&path).unwrap();
        store.save(&PlateTable::new("run-1")).unwrap();
        drop(store);

        let (_, stored) = load_latest(&path, "run-1").unwrap();

        assert_eq!(stored.plate.name(), "run-1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn load_latest_reports_unknown_plates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("elisa.db");

        let result = load_latest(&path, "missing");

        assert!(matches!(result, Err(CliError::PlateNotFound(name)) if name == "missing"));
    }
}
