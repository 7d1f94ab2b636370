use crate::core::models::address::{AddressError, COLUMNS, ROWS, WellAddress};
use crate::core::models::category::{Category, UnknownCategory};
use crate::core::models::plate::{CellEntry, CellGrid, PlateTable, empty_cell_grid};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Names and values table size mismatch: {names_rows} name row(s) but {values_rows} value row(s)"
    )]
    ShapeMismatch {
        names_rows: usize,
        values_rows: usize,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Layout record {record}: {source}")]
    Address {
        record: usize,
        #[source]
        source: AddressError,
    },

    #[error("Layout record {record}: {source}")]
    Category {
        record: usize,
        #[source]
        source: UnknownCategory,
    },

    #[error("Well {0} appears more than once in the layout")]
    DuplicateWell(WellAddress),
}

/// Splits pasted text into rows of cells.
///
/// Blank lines are skipped. Commas and tabs delimit cells, so `"a,,b"` keeps an empty middle
/// cell; runs of other whitespace also separate cells but never produce empty ones.
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(split_cells)
        .collect()
}

fn split_cells(line: &str) -> Vec<String> {
    line.split([',', '\t'])
        .flat_map(|field| {
            let field = field.trim();
            if field.is_empty() {
                vec![String::new()]
            } else {
                field.split_whitespace().map(str::to_string).collect()
            }
        })
        .collect()
}

/// Builds a plate from a pasted sample-name table and a pasted value table of the same shape.
///
/// Row `i`, column `j` of both tables describe well `(i, j)`. Rows whose lengths differ between
/// the two tables are padded with empty cells. Cells beyond the 8x12 grid are dropped with a
/// warning.
///
/// # Errors
///
/// Returns [`LayoutError::ShapeMismatch`] if the tables have different row counts; no plate is
/// produced in that case.
pub fn build_from_text_tables(
    name: &str,
    names_text: &str,
    values_text: &str,
) -> Result<PlateTable, LayoutError> {
    let names = parse_table(names_text);
    let values = parse_table(values_text);
    if names.len() != values.len() {
        return Err(LayoutError::ShapeMismatch {
            names_rows: names.len(),
            values_rows: values.len(),
        });
    }

    let mut cells = empty_cell_grid();
    let mut dropped = 0;
    for (row, (name_row, value_row)) in names.iter().zip(&values).enumerate() {
        let width = name_row.len().max(value_row.len());
        for column in 0..width {
            if row >= ROWS || column >= COLUMNS {
                dropped += 1;
                continue;
            }
            cells[row][column] = CellEntry::new(
                name_row.get(column).cloned().unwrap_or_default(),
                value_row.get(column).cloned().unwrap_or_default(),
            );
        }
    }
    if dropped > 0 {
        warn!(
            "Ignored {} cell(s) outside the {}x{} plate grid.",
            dropped, ROWS, COLUMNS
        );
    }

    debug!(
        "Parsed {} table row(s) for plate '{}'.",
        names.len(),
        name
    );
    Ok(PlateTable::build(name, cells))
}

#[derive(Debug, Deserialize)]
struct LayoutRecord {
    well: String,
    #[serde(default)]
    sample: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "label")]
    serum: Option<String>,
}

/// A category request read from a layout file, applied to the plate by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutAssignment {
    pub well: WellAddress,
    pub category: Category,
    pub label: Option<String>,
}

/// The content of a CSV plate layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateLayout {
    pub cells: CellGrid,
    /// Category requests in file order.
    pub assignments: Vec<LayoutAssignment>,
}

impl PlateLayout {
    pub fn into_plate(self, name: &str) -> (PlateTable, Vec<LayoutAssignment>) {
        (PlateTable::build(name, self.cells), self.assignments)
    }
}

/// Reads a CSV layout with a header row and the columns `well, sample, value` plus the optional
/// `category` and `serum` (or `label`) columns. Wells not listed stay empty.
///
/// # Errors
///
/// Fails on malformed CSV, invalid well addresses, unknown categories and wells listed twice.
pub fn read_layout(reader: impl Read) -> Result<PlateLayout, LayoutError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut cells = empty_cell_grid();
    let mut assignments = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in csv_reader.deserialize::<LayoutRecord>().enumerate() {
        let record_number = index + 1;
        let record = result?;
        let well = WellAddress::parse(&record.well).map_err(|source| LayoutError::Address {
            record: record_number,
            source,
        })?;
        if !seen.insert(well) {
            return Err(LayoutError::DuplicateWell(well));
        }

        cells[well.row()][well.column()] = CellEntry::new(record.sample, record.value);

        let label = record.serum.filter(|s| !s.is_empty());
        match record.category.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let category = text.parse().map_err(|source| LayoutError::Category {
                    record: record_number,
                    source,
                })?;
                assignments.push(LayoutAssignment {
                    well,
                    category,
                    label,
                });
            }
            _ => {
                if let Some(label) = label {
                    assignments.push(LayoutAssignment {
                        well,
                        category: Category::Unassigned,
                        label: Some(label),
                    });
                }
            }
        }
    }

    Ok(PlateLayout { cells, assignments })
}

pub fn read_layout_path(path: impl AsRef<Path>) -> Result<PlateLayout, LayoutError> {
    let file = std::fs::File::open(path)?;
    read_layout(io::BufReader::new(file))
}
