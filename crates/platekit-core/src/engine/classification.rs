use super::config::{ClassificationConfig, ThresholdMethod};
use super::error::EngineError;
use super::normalization::{NormalizationSummary, normalize};
use super::stats;
use crate::core::models::category::Category;
use crate::core::models::plate::PlateTable;
use crate::core::models::well::WellResult;
use tracing::{debug, warn};

/// The negative-control statistics and outcome counts of a classification pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationSummary {
    pub normalization: NormalizationSummary,
    pub method: ThresholdMethod,
    pub multiplier: f64,
    pub control_count: usize,
    pub control_mean: f64,
    /// Sample standard deviation of the controls; `0.0` for a single control.
    pub control_std_dev: f64,
    pub threshold: f64,
    pub positives: usize,
    pub negatives: usize,
}

/// Derives the positive/negative cutoff from the normalized negative-control values.
///
/// Returns `None` when there are no controls.
pub fn compute_threshold(method: ThresholdMethod, multiplier: f64, controls: &[f64]) -> Option<f64> {
    let mean = stats::mean(controls)?;
    let threshold = match method {
        ThresholdMethod::StandardDeviation => mean + multiplier * stats::sample_std_dev(controls)?,
        ThresholdMethod::Multiplier => mean * multiplier,
    };
    Some(threshold)
}

/// Normalizes the plate, derives the threshold from the `K- healthy` wells and labels every
/// normalized well: strictly above the threshold is positive, anything else negative.
///
/// Categories and labels are never modified.
///
/// # Errors
///
/// Returns [`EngineError::NoControlData`] when no negative-control well has a value, and
/// [`EngineError::NonFinite`] when the readings overflow the baseline, a normalized value or the
/// threshold. In both cases no well carries a result afterwards.
pub fn classify(
    plate: &mut PlateTable,
    config: &ClassificationConfig,
) -> Result<ClassificationSummary, EngineError> {
    let normalization = normalize(plate)?;

    let controls: Vec<f64> = plate
        .wells_in(Category::NegativeHealthy)
        .filter_map(|w| w.normalized_value())
        .collect();

    let Some(threshold) = compute_threshold(config.method, config.multiplier, &controls) else {
        warn!(
            "Plate '{}' has no '{}' readings; skipping classification.",
            plate.name(),
            Category::NegativeHealthy
        );
        plate.wells_mut().iter_mut().for_each(|w| w.result = None);
        return Err(EngineError::NoControlData);
    };
    if !threshold.is_finite() {
        warn!(
            "Plate '{}' produced a non-finite threshold; skipping classification.",
            plate.name()
        );
        plate.wells_mut().iter_mut().for_each(|w| w.result = None);
        return Err(EngineError::NonFinite("threshold"));
    }

    let control_mean = stats::mean(&controls).unwrap_or_default();
    let control_std_dev = stats::sample_std_dev(&controls).unwrap_or_default();

    let mut positives = 0;
    let mut negatives = 0;
    for well in plate.wells_mut() {
        well.result = well.normalized_value.map(|value| {
            if value > threshold {
                positives += 1;
                WellResult::Positive
            } else {
                negatives += 1;
                WellResult::Negative
            }
        });
    }

    debug!(
        "Classified plate '{}' with {} (x{}) threshold {:.4}: {} positive, {} negative.",
        plate.name(),
        config.method,
        config.multiplier,
        threshold,
        positives,
        negatives
    );

    Ok(ClassificationSummary {
        normalization,
        method: config.method,
        multiplier: config.multiplier,
        control_count: controls.len(),
        control_mean,
        control_std_dev,
        threshold,
        positives,
        negatives,
    })
}
