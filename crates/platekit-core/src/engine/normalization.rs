use super::error::EngineError;
use super::stats;
use crate::core::models::category::Category;
use crate::core::models::plate::PlateTable;
use tracing::{debug, warn};

/// What a normalization pass computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationSummary {
    /// Mean raw value of the substrate blanks, or `0.0` when no blank has a reading.
    pub blank: f64,
    /// Number of blank wells that contributed to `blank`.
    pub blank_wells: usize,
    /// Number of wells that received a normalized value.
    pub normalized_wells: usize,
}

/// Mean raw value of the substrate-blank wells that have a reading, `0.0` if there are none.
pub fn blank_baseline(plate: &PlateTable) -> (f64, usize) {
    let blanks: Vec<f64> = plate
        .wells_in(Category::SubstrateBlank)
        .filter_map(|w| w.raw_value())
        .collect();
    (stats::mean(&blanks).unwrap_or(0.0), blanks.len())
}

/// Subtracts the blank baseline from every raw value.
///
/// Wells without a reading get no normalized value. The pass depends only on the current raw
/// values and categories, so running it again without changes yields the same plate.
///
/// # Errors
///
/// Returns [`EngineError::NonFinite`] if the baseline or any normalized value overflows. No
/// well keeps a normalized value or result in that case.
pub fn normalize(plate: &mut PlateTable) -> Result<NormalizationSummary, EngineError> {
    let (blank, blank_wells) = blank_baseline(plate);
    if !blank.is_finite() {
        warn!("Plate '{}' has a non-finite blank baseline.", plate.name());
        plate.invalidate_derived();
        return Err(EngineError::NonFinite("blank baseline"));
    }
    if blank_wells == 0 {
        debug!(
            "Plate '{}' has no blank readings; using a zero baseline.",
            plate.name()
        );
    }

    let mut normalized_wells = 0;
    for well in plate.wells_mut() {
        well.normalized_value = well.raw_value.map(|raw| raw - blank);
        if well.normalized_value.is_some() {
            normalized_wells += 1;
        }
    }
    if plate
        .wells()
        .iter()
        .any(|w| w.normalized_value().is_some_and(|v| !v.is_finite()))
    {
        warn!(
            "Plate '{}' has readings too far from the blank baseline to normalize.",
            plate.name()
        );
        plate.invalidate_derived();
        return Err(EngineError::NonFinite("normalized value"));
    }

    debug!(
        "Normalized {} well(s) on plate '{}' against blank {:.4} ({} blank well(s)).",
        normalized_wells,
        plate.name(),
        blank,
        blank_wells
    );

    Ok(NormalizationSummary {
        blank,
        blank_wells,
        normalized_wells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::address::WellAddress;
    use crate::engine::assign::assign_text;

    const EPS: f64 = 1e-12;

    fn addr(text: &str) -> WellAddress {
        WellAddress::parse(text).unwrap()
    }

    #[test]
    fn subtracts_the_mean_of_blank_wells() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(0.1));
        plate.set_raw_value(addr("A2"), Some(0.2));
        plate.set_raw_value(addr("B1"), Some(0.5));
        assign_text(&mut plate, Category::SubstrateBlank, "A1 A2", None);

        let summary = normalize(&mut plate).unwrap();

        assert!((summary.blank - 0.15).abs() < EPS);
        assert_eq!(summary.blank_wells, 2);
        assert_eq!(summary.normalized_wells, 3);
        let sample = plate.well(addr("B1")).normalized_value().unwrap();
        assert!((sample - 0.35).abs() < EPS);
    }

    #[test]
    fn without_blanks_normalized_equals_raw() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(0.25));
        plate.set_raw_value(addr("H12"), Some(1.5));

        let summary = normalize(&mut plate).unwrap();

        assert_eq!(summary.blank, 0.0);
        for well in plate.wells() {
            assert_eq!(well.normalized_value(), well.raw_value());
        }
    }

    #[test]
    fn blank_wells_without_readings_are_ignored() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(0.3));
        plate.set_raw_value(addr("B1"), Some(1.0));
        assign_text(&mut plate, Category::SubstrateBlank, "A1 A2", None);

        let summary = normalize(&mut plate).unwrap();

        assert_eq!(summary.blank_wells, 1);
        assert!((plate.well(addr("B1")).normalized_value().unwrap() - 0.7).abs() < EPS);
    }

    #[test]
    fn wells_without_readings_stay_absent() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(0.3));

        normalize(&mut plate).unwrap();

        assert_eq!(plate.well(addr("A2")).normalized_value(), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(0.1));
        plate.set_raw_value(addr("C5"), Some(0.8));
        assign_text(&mut plate, Category::SubstrateBlank, "A1", None);

        normalize(&mut plate).unwrap();
        let once = plate.clone();
        normalize(&mut plate).unwrap();

        assert_eq!(plate, once);
    }

    #[test]
    fn huge_blank_readings_still_give_a_finite_baseline() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(1e308));
        plate.set_raw_value(addr("A2"), Some(1e308));
        plate.set_raw_value(addr("B1"), Some(0.9));
        assign_text(&mut plate, Category::SubstrateBlank, "A1 A2", None);

        let summary = normalize(&mut plate).unwrap();

        assert!(summary.blank.is_finite());
        assert!(plate.wells().iter().all(|w| w.normalized_value().is_none_or(f64::is_finite)));
    }

    #[test]
    fn overflowing_normalized_value_is_reported() {
        let mut plate = PlateTable::new("p");
        plate.set_raw_value(addr("A1"), Some(-1.5e308));
        plate.set_raw_value(addr("B1"), Some(1.5e308));
        assign_text(&mut plate, Category::SubstrateBlank, "A1", None);

        let result = normalize(&mut plate);

        assert_eq!(result, Err(EngineError::NonFinite("normalized value")));
        assert!(plate.wells().iter().all(|w| w.normalized_value().is_none()));
    }
}
