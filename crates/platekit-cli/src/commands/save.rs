use crate::cli::{PlateInputArgs, SaveArgs};
use crate::config::{AppConfig, ConfigOverrides, build_config};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::remote::RemoteSheetSink;
use crate::render;
use crate::utils::parser::{parse_assignment, parse_selection};
use crate::utils::progress::CliProgressHandler;
use platekit::core::io::layout::{build_from_text_tables, read_layout_path};
use platekit::core::io::sheet::SheetDirSink;
use platekit::core::io::traits::ExportSink;
use platekit::core::models::category::Category;
use platekit::core::models::plate::PlateTable;
use platekit::core::store::PlateStore;
use platekit::engine::assign::{CategoryBatch, apply_batches, assign};
use platekit::engine::error::EngineError;
use platekit::engine::progress::ProgressReporter;
use platekit::workflows;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: SaveArgs, config_path: Option<&Path>, set_values: &[String]) -> Result<()> {
    info!("Initializing data manager...");
    let data_manager = DataManager::new()?;
    let config = build_config(
        &ConfigOverrides::from(&args.method),
        config_path,
        set_values,
        &data_manager,
    )?;

    let mut plate = load_plate(&args.name, &args.input)?;
    let batches = category_batches(&args)?;
    let tagged = apply_batches(&mut plate, &batches);
    info!("Applied {} category batch(es) covering {} well(s).", batches.len(), tagged);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    if args.analyze {
        analyze_before_save(&mut plate, &config, &reporter)?;
    }

    let sinks = export_sinks(&args, &config);
    let sink_refs: Vec<&dyn ExportSink> = sinks.iter().map(|s| s.as_ref()).collect();
    let include_results = config.include_results && plate.has_results();

    let report = tokio::task::block_in_place(|| -> Result<_> {
        let mut store = PlateStore::open(&config.database_path)?;
        Ok(workflows::save::run(
            &plate,
            &mut store,
            &sink_refs,
            include_results,
            &reporter,
        )?)
    })?;

    println!(
        "✓ Plate '{}' saved to {} (id {}).",
        plate.name(),
        config.database_path.display(),
        report.plate_id
    );
    for receipt in &report.exports {
        println!("  Exported to {}: {}", receipt.sink, receipt.location);
    }
    for warning in &report.warnings {
        println!("  Warning: {} export failed: {}", warning.sink, warning.message);
    }
    Ok(())
}

fn load_plate(name: &str, input: &PlateInputArgs) -> Result<PlateTable> {
    if let Some(layout_path) = &input.layout {
        info!("Reading plate layout from {:?}", layout_path);
        let layout = read_layout_path(layout_path).map_err(|source| CliError::Layout {
            path: layout_path.clone(),
            source,
        })?;
        let (mut plate, assignments) = layout.into_plate(name);
        for a in &assignments {
            assign(&mut plate, a.category, [a.well], a.label.as_deref());
        }
        return Ok(plate);
    }

    let (Some(names_path), Some(values_path)) = (&input.names, &input.values) else {
        return Err(CliError::Argument(
            "Provide either --layout or both --names and --values.".to_string(),
        ));
    };
    info!(
        "Reading plate tables from {:?} and {:?}",
        names_path, values_path
    );
    let names = std::fs::read_to_string(names_path)?;
    let values = std::fs::read_to_string(values_path)?;
    build_from_text_tables(name, &names, &values).map_err(|source| CliError::Layout {
        path: values_path.clone(),
        source,
    })
}

/// Convenience flags first (K+, K- healthy, K- buffer, blank), then `--assign`, then `--select`.
/// Later batches override earlier ones.
fn category_batches(args: &SaveArgs) -> Result<Vec<CategoryBatch>> {
    let convenience = [
        (Category::PositiveControl, &args.kpos),
        (Category::NegativeHealthy, &args.kneg_healthy),
        (Category::NegativeBuffer, &args.kneg_buffer),
        (Category::SubstrateBlank, &args.blank),
    ];

    let mut batches: Vec<CategoryBatch> = convenience
        .into_iter()
        .filter_map(|(category, wells)| {
            wells
                .as_deref()
                .map(|text| CategoryBatch::from_text(category, text, None))
        })
        .collect();

    for text in &args.assign {
        batches.push(parse_assignment(text).map_err(|e| CliError::Argument(e.to_string()))?);
    }
    for text in &args.select {
        batches.push(parse_selection(text).map_err(|e| CliError::Argument(e.to_string()))?);
    }
    Ok(batches)
}

fn analyze_before_save(
    plate: &mut PlateTable,
    config: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<()> {
    match workflows::analyze::run(plate, &config.classification, reporter) {
        Ok(summary) => {
            println!("{}", render::analysis_summary(&summary));
            Ok(())
        }
        Err(EngineError::NoControlData) => {
            warn!("No K- healthy readings; saving without classification results.");
            println!("Warning: no K- healthy readings, results were not computed.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn export_sinks(args: &SaveArgs, config: &AppConfig) -> Vec<Box<dyn ExportSink>> {
    let mut sinks: Vec<Box<dyn ExportSink>> = Vec::new();
    if args.excel {
        sinks.push(Box::new(SheetDirSink::new(&config.sheet_dir)));
    }
    if args.remote {
        sinks.push(Box::new(RemoteSheetSink::new(config.remote.clone())));
    }
    sinks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use platekit::core::models::address::WellAddress;
    use std::fs;
    use tempfile::tempdir;

    fn save_args(extra: &[&str]) -> SaveArgs {
        let mut argv = vec!["platekit", "save", "--name", "p", "--layout", "l.csv"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Save(args) => args,
            _ => unreachable!(),
        }
    }

    fn addr(text: &str) -> WellAddress {
        WellAddress::parse(text).unwrap()
    }

    #[test]
    fn later_batches_override_convenience_flags() {
        let args = save_args(&[
            "--kpos",
            "A1 A2",
            "--blank",
            "A2",
            "--assign",
            "healthy:A1@pool",
            "--select",
            "buffer:1,1",
        ]);
        let batches = category_batches(&args).unwrap();
        let mut plate = PlateTable::new("p");

        apply_batches(&mut plate, &batches);

        assert_eq!(plate.well(addr("A1")).category(), Category::NegativeBuffer);
        assert_eq!(plate.well(addr("A1")).label(), Some("pool"));
        assert_eq!(plate.well(addr("A2")).category(), Category::SubstrateBlank);
    }

    #[test]
    fn malformed_assignment_is_an_argument_error() {
        let args = save_args(&["--assign", "A1,A2"]);
        assert!(matches!(
            category_batches(&args),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn layout_files_are_loaded_with_their_categories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.csv");
        fs::write(&path, "well,sample,value,category\nA1,blank,0.1,blank\nA2,s,0.5,\n").unwrap();
        let input = PlateInputArgs {
            names: None,
            values: None,
            layout: Some(path),
        };

        let plate = load_plate("p", &input).unwrap();

        assert_eq!(plate.well(addr("A1")).category(), Category::SubstrateBlank);
        assert_eq!(plate.well(addr("A2")).raw_value(), Some(0.5));
    }

    #[test]
    fn mismatched_text_tables_are_reported_with_the_input_path() {
        let dir = tempdir().unwrap();
        let names = dir.path().join("names.txt");
        let values = dir.path().join("values.txt");
        fs::write(&names, "a b\nc d\n").unwrap();
        fs::write(&values, "0.1 0.2\n").unwrap();
        let input = PlateInputArgs {
            names: Some(names),
            values: Some(values),
            layout: None,
        };

        let result = load_plate("p", &input);

        assert!(matches!(result, Err(CliError::Layout { .. })));
    }
}
