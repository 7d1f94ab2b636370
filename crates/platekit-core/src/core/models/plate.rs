use super::address::{COLUMNS, ROWS, WELL_COUNT, WellAddress};
use super::category::Category;
use super::well::{WellRecord, WellResult, parse_raw_value};

/// The user-entered content of one cell before it becomes a [`WellRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellEntry {
    pub sample_name: String,
    pub raw_value_text: String,
}

impl CellEntry {
    pub fn new(sample_name: impl Into<String>, raw_value_text: impl Into<String>) -> Self {
        Self {
            sample_name: sample_name.into(),
            raw_value_text: raw_value_text.into(),
        }
    }
}

/// A complete 8x12 enumeration of cell entries, indexed `[row][column]`.
pub type CellGrid = [[CellEntry; COLUMNS]; ROWS];

/// Creates a grid of empty cell entries.
pub fn empty_cell_grid() -> CellGrid {
    std::array::from_fn(|_| std::array::from_fn(|_| CellEntry::default()))
}

/// An in-memory assay plate: exactly one [`WellRecord`] per address.
///
/// The grid is a fixed array indexed by [`WellAddress::index`] and is fully populated from the
/// moment the plate is created. Changing a raw value or a category invalidates the derived
/// fields (`normalized_value`, `result`) of every well, since the blank baseline and the
/// threshold depend on the whole plate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateTable {
    name: String,
    wells: Box<[WellRecord; WELL_COUNT]>,
}

impl PlateTable {
    /// Creates a plate whose wells are all empty and unassigned.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wells: Box::new(std::array::from_fn(|index| {
                WellRecord::empty(WellAddress::from_grid_index(index))
            })),
        }
    }

    /// Builds a plate from a complete grid of `(sample name, raw value text)` entries.
    ///
    /// Value text that is empty or does not parse as a finite number leaves the well's raw value
    /// absent; this never fails.
    pub fn build(name: impl Into<String>, cells: CellGrid) -> Self {
        let mut plate = Self::new(name);
        for (row, cells_in_row) in cells.into_iter().enumerate() {
            for (column, entry) in cells_in_row.into_iter().enumerate() {
                let well = &mut plate.wells[row * COLUMNS + column];
                well.raw_value = parse_raw_value(&entry.raw_value_text);
                well.sample_name = entry.sample_name;
            }
        }
        plate
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All wells in row-major order.
    pub fn wells(&self) -> &[WellRecord] {
        self.wells.as_slice()
    }

    pub fn well(&self, address: WellAddress) -> &WellRecord {
        &self.wells[address.index()]
    }

    pub fn well_at(&self, row: usize, column: usize) -> Option<&WellRecord> {
        WellAddress::new(row, column).ok().map(|addr| self.well(addr))
    }

    /// Wells currently tagged with `category`.
    pub fn wells_in(&self, category: Category) -> impl Iterator<Item = &WellRecord> {
        self.wells.iter().filter(move |w| w.category == category)
    }

    pub fn set_sample_name(&mut self, address: WellAddress, sample_name: impl Into<String>) {
        self.wells[address.index()].sample_name = sample_name.into();
    }

    /// Replaces a well's reading and invalidates all derived values if it changed.
    pub fn set_raw_value(&mut self, address: WellAddress, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let well = &mut self.wells[address.index()];
        if well.raw_value != value {
            well.raw_value = value;
            self.invalidate_derived();
        }
    }

    /// Parses `text` leniently (see [`parse_raw_value`]) and stores the result.
    pub fn set_raw_value_text(&mut self, address: WellAddress, text: &str) {
        self.set_raw_value(address, parse_raw_value(text));
    }

    /// Sets or clears a well's free-text label. Labels do not feed any derived value.
    pub fn set_label(&mut self, address: WellAddress, label: Option<String>) {
        self.wells[address.index()].label = label.filter(|l| !l.is_empty());
    }

    /// Tags a well without touching the derived caches; callers batch the invalidation.
    /// Returns `true` when the category actually changed.
    pub(crate) fn tag_well(
        &mut self,
        address: WellAddress,
        category: Category,
        label: Option<&str>,
    ) -> bool {
        let well = &mut self.wells[address.index()];
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            well.label = Some(label.to_string());
        }
        let changed = well.category != category;
        well.category = category;
        changed
    }

    /// Drops every cached normalized value and result.
    pub fn invalidate_derived(&mut self) {
        self.wells.iter_mut().for_each(WellRecord::clear_derived);
    }

    pub fn has_normalized_values(&self) -> bool {
        self.wells.iter().any(|w| w.normalized_value.is_some())
    }

    pub fn has_results(&self) -> bool {
        self.wells.iter().any(|w| w.result.is_some())
    }

    pub(crate) fn wells_mut(&mut self) -> &mut [WellRecord] {
        self.wells.as_mut_slice()
    }

    pub(crate) fn well_mut(&mut self, address: WellAddress) -> &mut WellRecord {
        &mut self.wells[address.index()]
    }

    /// Reinstates stored derived values, e.g. when a plate is read back from storage.
    pub(crate) fn restore_derived(
        &mut self,
        address: WellAddress,
        normalized_value: Option<f64>,
        result: Option<WellResult>,
    ) {
        let well = self.well_mut(address);
        well.normalized_value = normalized_value;
        well.result = result;
    }
}
