use crate::core::models::plate::PlateTable;
use crate::engine::classification::{ClassificationSummary, classify};
use crate::engine::config::ClassificationConfig;
use crate::engine::error::EngineError;
use crate::engine::normalization::normalize;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Normalizes and classifies `plate` in place.
///
/// # Errors
///
/// Returns [`EngineError::NoControlData`] if the plate has no `K- healthy` reading. The
/// normalized values are kept in that case, but no well carries a result. Returns
/// [`EngineError::NonFinite`] if the readings are too large to analyze.
#[instrument(skip_all, name = "analysis_workflow", fields(plate = %plate.name()))]
pub fn run(
    plate: &mut PlateTable,
    config: &ClassificationConfig,
    reporter: &ProgressReporter,
) -> Result<ClassificationSummary, EngineError> {
    let normalization = reporter.phase("Normalization", || normalize(plate))?;
    reporter.report(Progress::Message(format!(
        "Blank baseline {:.4} from {} well(s)",
        normalization.blank, normalization.blank_wells
    )));

    let summary = reporter.phase("Classification", || classify(plate, config))?;
    reporter.report(Progress::Message(format!(
        "Threshold {:.4}: {} positive, {} negative",
        summary.threshold, summary.positives, summary.negatives
    )));

    info!(
        "Analysis complete. Threshold {:.4} ({}), {} positive / {} negative.",
        summary.threshold, summary.method, summary.positives, summary.negatives
    );
    Ok(summary)
}
