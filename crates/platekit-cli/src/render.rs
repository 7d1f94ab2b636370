//! Plain-text views of plates and analysis results.

use platekit::core::models::address::{COLUMNS, ROWS};
use platekit::core::models::plate::PlateTable;
use platekit::core::models::well::WellResult;
use platekit::core::store::PlateSummary;
use platekit::engine::classification::ClassificationSummary;
use std::fmt::Write;

const NO_DATA: &str = "No data found";

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

fn has_data(plate: &PlateTable) -> bool {
    plate.wells().iter().any(|w| !w.is_empty())
}

/// One line per well with data: well, sample, value, category, serum, normalized, result.
pub fn plate_table(plate: &PlateTable) -> String {
    if !has_data(plate) {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<16} {:>10} {:<16} {:<12} {:>10} {:<8}",
        "well", "sample", "value", "category", "serum", "normalized", "result"
    );
    for well in plate.wells().iter().filter(|w| !w.is_empty()) {
        let _ = writeln!(
            out,
            "{:<5} {:<16} {:>10} {:<16} {:<12} {:>10} {:<8}",
            well.address().to_string(),
            well.sample_name(),
            number(well.raw_value()),
            well.category().as_label(),
            well.label().unwrap_or_default(),
            number(well.normalized_value()),
            well.result().map(|r| r.as_str()).unwrap_or_default(),
        );
    }
    out.trim_end().to_string()
}

/// An 8x12 grid of normalized values, or raw values when the plate is not normalized.
/// Positive wells carry a `+` suffix.
pub fn plate_grid(plate: &PlateTable) -> String {
    if !has_data(plate) {
        return NO_DATA.to_string();
    }
    let normalized = plate.has_normalized_values();

    let mut out = String::from("  ");
    for column in 1..=COLUMNS {
        let _ = write!(out, " {:>8}", column);
    }
    for row in 0..ROWS {
        out.push('\n');
        out.push((b'A' + row as u8) as char);
        out.push(' ');
        for column in 0..COLUMNS {
            let Some(well) = plate.well_at(row, column) else {
                continue;
            };
            let value = if normalized {
                well.normalized_value()
            } else {
                well.raw_value()
            };
            let mut cell = value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".into());
            if well.result() == Some(WellResult::Positive) {
                cell.push('+');
            }
            let _ = write!(out, " {:>8}", cell);
        }
    }
    out
}

pub fn analysis_summary(summary: &ClassificationSummary) -> String {
    format!(
        "Blank baseline:   {:.4} ({} well(s))\n\
         Controls:         {} well(s), mean {:.4}, sd {:.4}\n\
         Threshold:        {:.4} ({}, k = {})\n\
         Results:          {} positive, {} negative",
        summary.normalization.blank,
        summary.normalization.blank_wells,
        summary.control_count,
        summary.control_mean,
        summary.control_std_dev,
        summary.threshold,
        summary.method,
        summary.multiplier,
        summary.positives,
        summary.negatives,
    )
}

pub fn plate_list(plates: &[PlateSummary]) -> String {
    if plates.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = format!("{:>5}  {:<24} {:<20} {:>5}", "id", "name", "created", "wells");
    for plate in plates {
        let _ = write!(
            out,
            "\n{:>5}  {:<24} {:<20} {:>5}",
            plate.id, plate.name, plate.created_at, plate.well_count
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use platekit::core::io::layout::build_from_text_tables;
    use platekit::core::models::category::Category;
    use platekit::engine::assign::assign_text;
    use platekit::engine::classification::classify;
    use platekit::engine::config::{ClassificationConfig, ThresholdMethod};

    fn analyzed_plate() -> PlateTable {
        let mut plate =
            build_from_text_tables("p", "blank ctrl ctrl donor", "0.2 0.3 0.5 0.9").unwrap();
        assign_text(&mut plate, Category::SubstrateBlank, "A1", None);
        assign_text(&mut plate, Category::NegativeHealthy, "A2 A3", None);
        classify(
            &mut plate,
            &ClassificationConfig {
                method: ThresholdMethod::StandardDeviation,
                multiplier: 1.0,
            },
        )
        .unwrap();
        plate
    }

    #[test]
    fn empty_plate_renders_no_data() {
        let plate = PlateTable::new("empty");
        assert_eq!(plate_table(&plate), "No data found");
        assert_eq!(plate_grid(&plate), "No data found");
        assert_eq!(plate_list(&[]), "No data found");
    }

    #[test]
    fn table_lists_only_wells_with_data() {
        let table = plate_table(&analyzed_plate());
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("well"));
        assert!(lines[4].starts_with("A4"));
        assert!(lines[4].contains("positive"));
        assert!(lines[1].contains("substrate blank"));
    }

    #[test]
    fn grid_marks_positive_wells() {
        let grid = plate_grid(&analyzed_plate());
        let lines: Vec<_> = grid.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[1].starts_with("A "));
        assert!(lines[1].contains("0.700+"));
        assert!(lines[1].contains("0.000"));
        assert!(lines[2].contains('-'));
    }

    #[test]
    fn summary_mentions_threshold_and_counts() {
        let mut plate = analyzed_plate();
        let summary = classify(
            &mut plate,
            &ClassificationConfig {
                method: ThresholdMethod::Multiplier,
                multiplier: 2.0,
            },
        )
        .unwrap();

        let text = analysis_summary(&summary);

        assert!(text.contains("Threshold:        0.4000"));
        assert!(text.contains("1 positive, 3 negative"));
    }
}
