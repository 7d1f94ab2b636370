use crate::core::models::address::WellAddress;
use crate::core::models::category::Category;
use crate::core::models::plate::PlateTable;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Parses a free-text list of well addresses such as `"a1, B2  c3"`.
///
/// Tokens are separated by any run of whitespace and/or commas. Empty tokens and tokens that
/// are not valid addresses are dropped, so one typo does not discard the rest of the list.
/// Duplicates collapse.
pub fn parse_address_set(text: &str) -> BTreeSet<WellAddress> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .filter_map(|token| match WellAddress::parse(&token.to_ascii_uppercase()) {
            Ok(address) => Some(address),
            Err(e) => {
                trace!("Dropping well token: {}", e);
                None
            }
        })
        .collect()
}

/// Tags every given well with `category`, the single entry point for all category input paths.
///
/// A non-empty `label` is attached to each tagged well; an empty or missing label leaves any
/// existing label in place. The most recent call wins for a given well. If any well's category
/// changes, the derived values of the whole plate are invalidated.
///
/// # Return
///
/// Returns the number of wells tagged.
pub fn assign(
    plate: &mut PlateTable,
    category: Category,
    addresses: impl IntoIterator<Item = WellAddress>,
    label: Option<&str>,
) -> usize {
    let mut tagged = 0;
    let mut changed = false;
    for address in addresses {
        changed |= plate.tag_well(address, category, label);
        tagged += 1;
    }
    if changed {
        plate.invalidate_derived();
    }
    debug!(
        "Assigned {} well(s) to '{}' on plate '{}'",
        tagged,
        category,
        plate.name()
    );
    tagged
}

/// Typed-list adapter: parses `text` with [`parse_address_set`] and assigns the result.
pub fn assign_text(
    plate: &mut PlateTable,
    category: Category,
    text: &str,
    label: Option<&str>,
) -> usize {
    assign(plate, category, parse_address_set(text), label)
}

/// Cell-selection adapter: assigns zero-based `(row, column)` pairs.
///
/// Pairs outside the 8x12 grid are ignored.
pub fn assign_selection(
    plate: &mut PlateTable,
    category: Category,
    cells: impl IntoIterator<Item = (usize, usize)>,
    label: Option<&str>,
) -> usize {
    assign(plate, category, selection_addresses(cells), label)
}

fn selection_addresses(cells: impl IntoIterator<Item = (usize, usize)>) -> BTreeSet<WellAddress> {
    cells
        .into_iter()
        .filter_map(|(row, column)| match WellAddress::new(row, column) {
            Ok(address) => Some(address),
            Err(e) => {
                trace!("Dropping selected cell: {}", e);
                None
            }
        })
        .collect()
}

/// One category assignment request: a set of wells, their category and an optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBatch {
    pub category: Category,
    pub wells: BTreeSet<WellAddress>,
    pub label: Option<String>,
}

impl CategoryBatch {
    pub fn from_text(category: Category, text: &str, label: Option<String>) -> Self {
        Self {
            category,
            wells: parse_address_set(text),
            label,
        }
    }

    pub fn from_selection(
        category: Category,
        cells: impl IntoIterator<Item = (usize, usize)>,
        label: Option<String>,
    ) -> Self {
        Self {
            category,
            wells: selection_addresses(cells),
            label,
        }
    }

    pub fn apply(&self, plate: &mut PlateTable) -> usize {
        assign(
            plate,
            self.category,
            self.wells.iter().copied(),
            self.label.as_deref(),
        )
    }
}

/// Applies batches in order, so later batches override earlier ones.
pub fn apply_batches(plate: &mut PlateTable, batches: &[CategoryBatch]) -> usize {
    batches.iter().map(|batch| batch.apply(plate)).sum()
}
