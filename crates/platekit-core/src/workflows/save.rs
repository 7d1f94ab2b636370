use crate::core::io::sheet::ExportTable;
use crate::core::io::traits::{ExportReceipt, ExportSink};
use crate::core::models::plate::PlateTable;
use crate::core::store::{PlateId, PlateStore, StoreError};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// An export sink that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkWarning {
    pub sink: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub plate_id: PlateId,
    pub exports: Vec<ExportReceipt>,
    pub warnings: Vec<SinkWarning>,
}

/// Persists `plate` and then exports it to each sink in order.
///
/// Exports run only after the plate is stored, and they see exactly the stored data. A failing
/// sink is logged and recorded in [`SaveReport::warnings`]; the remaining sinks still run.
///
/// # Arguments
///
/// * `plate` - The plate to save, analyzed or not.
/// * `store` - The plate store receiving the new save.
/// * `sinks` - Export destinations; may be empty.
/// * `include_results` - Whether exported sheets carry the `normalized` and `result` columns.
/// * `reporter` - Progress sink for front-ends.
///
/// # Errors
///
/// Returns a [`StoreError`] if the plate could not be persisted; no sink runs in that case.
#[instrument(skip_all, name = "save_workflow", fields(plate = %plate.name()))]
pub fn run(
    plate: &PlateTable,
    store: &mut PlateStore,
    sinks: &[&dyn ExportSink],
    include_results: bool,
    reporter: &ProgressReporter,
) -> Result<SaveReport, StoreError> {
    let plate_id = reporter.phase("Saving", || store.save(plate))?;

    let mut exports = Vec::new();
    let mut warnings = Vec::new();
    if !sinks.is_empty() {
        let table = ExportTable::from_plate(plate, include_results);
        reporter.phase("Exporting", || {
            for sink in sinks {
                match sink.export(&table) {
                    Ok(receipt) => {
                        reporter.report(Progress::Message(format!(
                            "Exported to {} ({})",
                            receipt.sink, receipt.location
                        )));
                        exports.push(receipt);
                    }
                    Err(e) => {
                        warn!("Export to '{}' failed: {}", sink.name(), e);
                        warnings.push(SinkWarning {
                            sink: sink.name().to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        });
    }

    info!(
        "Plate saved as id {} with {} export(s) and {} warning(s).",
        plate_id,
        exports.len(),
        warnings.len()
    );
    Ok(SaveReport {
        plate_id,
        exports,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::sheet::SheetDirSink;
    use crate::core::io::traits::ExportError;
    use tempfile::tempdir;

    struct FailingSink;

    impl ExportSink for FailingSink {
        fn name(&self) -> &str {
            "broken"
        }

        fn export(&self, _table: &ExportTable) -> Result<ExportReceipt, ExportError> {
            Err(ExportError::Remote("service unreachable".to_string()))
        }
    }

    #[test]
    fn failing_sink_is_a_warning_and_does_not_block_other_sinks() {
        let dir = tempdir().unwrap();
        let sheet = SheetDirSink::new(dir.path());
        let mut store = PlateStore::open_in_memory().unwrap();
        let plate = PlateTable::new("p");
        let sinks: [&dyn ExportSink; 2] = [&FailingSink, &sheet];

        let report = run(
            &plate,
            &mut store,
            &sinks,
            false,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(report.exports.len(), 1);
        assert_eq!(report.exports[0].sink, "sheet");
        assert_eq!(
            report.warnings,
            vec![SinkWarning {
                sink: "broken".to_string(),
                message: "Remote sheet error: service unreachable".to_string(),
            }]
        );
        assert_eq!(
            store.fetch_latest("p").unwrap().unwrap().id,
            report.plate_id
        );
    }

    #[test]
    fn save_without_sinks_only_persists() {
        let mut store = PlateStore::open_in_memory().unwrap();
        let report = run(
            &PlateTable::new("solo"),
            &mut store,
            &[],
            true,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(report.exports.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(store.list_plates().unwrap().len(), 1);
    }
}
