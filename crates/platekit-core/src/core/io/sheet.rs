use super::traits::{ExportError, ExportReceipt, ExportSink};
use crate::core::models::plate::PlateTable;
use std::path::PathBuf;
use tracing::info;

/// Columns of every exported plate sheet.
pub const BASE_HEADER: [&str; 6] = ["plate", "well", "sample", "value", "category", "serum"];
/// Columns appended when classification results are exported.
pub const RESULT_HEADER: [&str; 2] = ["normalized", "result"];

const MAX_SHEET_SUFFIX: usize = 10_000;

/// A plate flattened into a header row and one row per well, in row-major well order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// The sheet/worksheet title, i.e. the plate name.
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ExportTable {
    pub fn from_plate(plate: &PlateTable, include_results: bool) -> Self {
        let mut header: Vec<String> = BASE_HEADER.iter().map(|s| s.to_string()).collect();
        if include_results {
            header.extend(RESULT_HEADER.iter().map(|s| s.to_string()));
        }

        let rows = plate
            .wells()
            .iter()
            .map(|well| {
                let mut row = vec![
                    plate.name().to_string(),
                    well.address().to_string(),
                    well.sample_name().to_string(),
                    format_number(well.raw_value()),
                    well.category().as_label().to_string(),
                    well.label().unwrap_or_default().to_string(),
                ];
                if include_results {
                    row.push(format_number(well.normalized_value()));
                    row.push(
                        well.result()
                            .map(|r| r.as_str().to_string())
                            .unwrap_or_default(),
                    );
                }
                row
            })
            .collect();

        Self {
            title: plate.name().to_string(),
            header,
            rows,
        }
    }

    /// Header followed by all rows, the shape spreadsheet APIs expect.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

/// Replaces characters that are unsafe in file names; an empty name becomes `plate`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "plate".to_string()
    } else {
        cleaned
    }
}

/// A local tabular sink: one CSV sheet per plate inside a directory.
///
/// Sheets are named after the plate. Saving a plate whose sheet already exists creates a new
/// sheet with a numeric suffix (`name1.csv`, `name2.csv`, ...) instead of overwriting.
#[derive(Debug, Clone)]
pub struct SheetDirSink {
    dir: PathBuf,
}

impl SheetDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn next_sheet_path(&self, title: &str) -> Result<PathBuf, ExportError> {
        let stem = sanitize_sheet_name(title);
        let first = self.dir.join(format!("{}.csv", stem));
        if !first.exists() {
            return Ok(first);
        }
        (1..MAX_SHEET_SUFFIX)
            .map(|n| self.dir.join(format!("{}{}.csv", stem, n)))
            .find(|path| !path.exists())
            .ok_or_else(|| ExportError::Unavailable {
                sink: self.name().to_string(),
                reason: format!("too many sheets named '{}'", stem),
            })
    }
}

impl ExportSink for SheetDirSink {
    fn name(&self) -> &str {
        "sheet"
    }

    fn export(&self, table: &ExportTable) -> Result<ExportReceipt, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.next_sheet_path(&table.title)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.header)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!(
            "Wrote {} row(s) of plate '{}' to {:?}",
            table.rows.len(),
            table.title,
            &path
        );
        Ok(ExportReceipt {
            sink: self.name().to_string(),
            location: path.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::address::WellAddress;
    use crate::core::models::category::Category;
    use crate::core::models::well::WellResult;
    use crate::engine::assign::assign_text;
    use tempfile::tempdir;

    fn sample_plate() -> PlateTable {
        let mut plate = PlateTable::new("run 7");
        let a1 = WellAddress::parse("A1").unwrap();
        plate.set_sample_name(a1, "blank");
        plate.set_raw_value(a1, Some(0.1));
        assign_text(&mut plate, Category::SubstrateBlank, "A1", Some("none"));
        plate.restore_derived(a1, Some(0.0), Some(WellResult::Negative));
        plate
    }

    #[test]
    fn table_has_one_row_per_well_with_base_header() {
        let table = ExportTable::from_plate(&sample_plate(), false);

        assert_eq!(table.title, "run 7");
        assert_eq!(table.header, BASE_HEADER.to_vec());
        assert_eq!(table.rows.len(), 96);
        assert_eq!(
            table.rows[0],
            vec!["run 7", "A1", "blank", "0.1", "substrate blank", "none"]
        );
        assert_eq!(table.rows[1], vec!["run 7", "A2", "", "", "", ""]);
        assert_eq!(table.rows[95][1], "H12");
    }

    #[test]
    fn result_columns_are_appended_when_requested() {
        let table = ExportTable::from_plate(&sample_plate(), true);

        assert_eq!(table.header.len(), 8);
        assert_eq!(&table.header[6..], &["normalized", "result"]);
        assert_eq!(&table.rows[0][6..], &["0", "negative"]);
        assert_eq!(&table.rows[1][6..], &["", ""]);
    }

    #[test]
    fn to_values_prepends_the_header() {
        let table = ExportTable::from_plate(&sample_plate(), false);
        let values = table.to_values();
        assert_eq!(values.len(), 97);
        assert_eq!(values[0][0], "plate");
    }

    #[test]
    fn sanitize_sheet_name_replaces_path_characters() {
        assert_eq!(sanitize_sheet_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_sheet_name("  "), "plate");
        assert_eq!(sanitize_sheet_name(".."), "plate");
        assert_eq!(sanitize_sheet_name("Plate 3-b"), "Plate 3-b");
    }

    #[test]
    fn sheet_sink_writes_csv_and_never_overwrites() {
        let dir = tempdir().unwrap();
        let sink = SheetDirSink::new(dir.path().join("sheets"));
        let table = ExportTable::from_plate(&sample_plate(), false);

        let first = sink.export(&table).unwrap();
        let second = sink.export(&table).unwrap();

        assert!(first.location.ends_with("run 7.csv"));
        assert!(second.location.ends_with("run 71.csv"));

        let content = std::fs::read_to_string(&first.location).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("plate,well,sample,value,category,serum"));
        assert_eq!(lines.next(), Some("run 7,A1,blank,0.1,substrate blank,none"));
        assert_eq!(content.lines().count(), 97);
    }
}
