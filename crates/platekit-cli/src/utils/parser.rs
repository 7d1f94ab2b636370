use platekit::core::models::category::{Category, UnknownCategory};
use platekit::engine::assign::CategoryBatch;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid assignment '{0}'. Expected 'CATEGORY:WELLS[@LABEL]' (e.g., 'kpos:A1,A2').")]
    MissingSeparator(String),

    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error("Invalid cell '{cell}' in selection '{spec}'. Expected 1-based 'ROW,COLUMN'.")]
    InvalidCell { cell: String, spec: String },
}

/// The three parts of a `CATEGORY:BODY[@LABEL]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec<'a> {
    pub category: Category,
    pub body: &'a str,
    pub label: Option<String>,
}

pub fn parse_category_spec(text: &str) -> Result<CategorySpec<'_>, ParseError> {
    let (category, rest) = text
        .split_once(':')
        .ok_or_else(|| ParseError::MissingSeparator(text.to_string()))?;
    let category: Category = category.parse()?;

    let (body, label) = match rest.rsplit_once('@') {
        Some((body, label)) => (body, Some(label.trim().to_string())),
        None => (rest, None),
    };

    Ok(CategorySpec {
        category,
        body: body.trim(),
        label: label.filter(|l| !l.is_empty()),
    })
}

/// Parses `--assign` text. Malformed well tokens inside the list are dropped, like any typed
/// well list.
pub fn parse_assignment(text: &str) -> Result<CategoryBatch, ParseError> {
    let spec = parse_category_spec(text)?;
    Ok(CategoryBatch::from_text(spec.category, spec.body, spec.label))
}

/// Parses `--select` text: `;`-separated 1-based `row,column` cells. Cells beyond the plate
/// are ignored when the batch is applied.
pub fn parse_selection(text: &str) -> Result<CategoryBatch, ParseError> {
    let spec = parse_category_spec(text)?;
    let cells = spec
        .body
        .split(';')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| parse_cell(cell, text))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CategoryBatch::from_selection(spec.category, cells, spec.label))
}

fn parse_cell(cell: &str, spec: &str) -> Result<(usize, usize), ParseError> {
    let invalid = || ParseError::InvalidCell {
        cell: cell.to_string(),
        spec: spec.to_string(),
    };
    let (row, column) = cell.split_once(',').ok_or_else(invalid)?;
    let row: usize = row.trim().parse().map_err(|_| invalid())?;
    let column: usize = column.trim().parse().map_err(|_| invalid())?;
    if row == 0 || column == 0 {
        return Err(invalid());
    }
    Ok((row - 1, column - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platekit::core::models::address::WellAddress;
    use std::collections::BTreeSet;

    fn wells(list: &[&str]) -> BTreeSet<WellAddress> {
        list.iter().map(|w| WellAddress::parse(w).unwrap()).collect()
    }

    #[test]
    fn category_spec_splits_category_body_and_label() {
        let spec = parse_category_spec("K- healthy:A1 A2@pool-3").unwrap();
        assert_eq!(spec.category, Category::NegativeHealthy);
        assert_eq!(spec.body, "A1 A2");
        assert_eq!(spec.label.as_deref(), Some("pool-3"));

        let spec = parse_category_spec("blank:H12").unwrap();
        assert_eq!(spec.category, Category::SubstrateBlank);
        assert_eq!(spec.label, None);
    }

    #[test]
    fn empty_label_is_treated_as_no_label() {
        let spec = parse_category_spec("kpos:A1@").unwrap();
        assert_eq!(spec.label, None);
    }

    #[test]
    fn missing_separator_and_unknown_category_are_errors() {
        assert_eq!(
            parse_category_spec("A1,A2"),
            Err(ParseError::MissingSeparator("A1,A2".to_string()))
        );
        assert!(matches!(
            parse_category_spec("mystery:A1"),
            Err(ParseError::UnknownCategory(_))
        ));
    }

    #[test]
    fn assignment_drops_malformed_wells() {
        let batch = parse_assignment("kpos:a1, Z9 ,B2").unwrap();
        assert_eq!(batch.category, Category::PositiveControl);
        assert_eq!(batch.wells, wells(&["A1", "B2"]));
    }

    #[test]
    fn selection_uses_one_based_cells_and_ignores_cells_off_the_plate() {
        let batch = parse_selection("buffer:1,1; 8,12;9,1@lot").unwrap();
        assert_eq!(batch.category, Category::NegativeBuffer);
        assert_eq!(batch.wells, wells(&["A1", "H12"]));
        assert_eq!(batch.label.as_deref(), Some("lot"));
    }

    #[test]
    fn selection_rejects_malformed_cells() {
        assert!(matches!(
            parse_selection("blank:1;2"),
            Err(ParseError::InvalidCell { .. })
        ));
        assert!(matches!(
            parse_selection("blank:0,1"),
            Err(ParseError::InvalidCell { .. })
        ));
    }
}
