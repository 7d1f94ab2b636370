use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of rows on a plate (`A`..`H`).
pub const ROWS: usize = 8;
/// Number of columns on a plate (`1`..`12`).
pub const COLUMNS: usize = 12;
/// Number of wells on a plate.
pub const WELL_COUNT: usize = ROWS * COLUMNS;

const ROW_LETTERS: [char; ROWS] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error(
        "Invalid well address '{0}'. Expected a row letter A-H followed by a column number 1-12 (e.g., 'B7')."
    )]
    InvalidAddress(String),

    #[error("Well coordinate (row {row}, column {column}) lies outside the 8x12 plate")]
    OutOfGrid { row: usize, column: usize },
}

/// A validated position on an 8x12 plate.
///
/// Addresses are zero-based internally (`row` in `0..8`, `column` in `0..12`) and render in
/// the canonical `<A-H><1-12>` form. The derived ordering is row-major, so sorted collections
/// of addresses iterate `A1, A2, .., A12, B1, ..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WellAddress {
    row: u8,
    column: u8,
}

impl WellAddress {
    /// Creates an address from zero-based grid coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::OutOfGrid`] if either coordinate falls outside the plate.
    pub fn new(row: usize, column: usize) -> Result<Self, AddressError> {
        if row >= ROWS || column >= COLUMNS {
            return Err(AddressError::OutOfGrid { row, column });
        }
        Ok(Self {
            row: row as u8,
            column: column as u8,
        })
    }

    /// Parses a well address such as `"A1"`, `"h12"` or `"c07"`.
    ///
    /// Parsing is case-insensitive and strict: exactly one row letter followed by one or two
    /// digits forming a column number between 1 and 12. Surrounding whitespace, signs and any
    /// other characters are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidAddress`] carrying the offending text.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let invalid = || AddressError::InvalidAddress(text.to_string());

        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let row = ROW_LETTERS
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(invalid)?;

        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: usize = digits.parse().map_err(|_| invalid())?;
        if !(1..=COLUMNS).contains(&number) {
            return Err(invalid());
        }

        Ok(Self {
            row: row as u8,
            column: (number - 1) as u8,
        })
    }

    pub(crate) fn from_grid_index(index: usize) -> Self {
        debug_assert!(index < WELL_COUNT);
        Self {
            row: (index / COLUMNS) as u8,
            column: (index % COLUMNS) as u8,
        }
    }

    /// Iterates over every address on the plate in row-major order.
    pub fn all() -> impl Iterator<Item = WellAddress> {
        (0..WELL_COUNT).map(Self::from_grid_index)
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.column as usize
    }

    pub fn row_letter(&self) -> char {
        ROW_LETTERS[self.row()]
    }

    /// The row-major index of this address, used to address the fixed plate array.
    pub fn index(&self) -> usize {
        self.row() * COLUMNS + self.column()
    }
}

impl fmt::Display for WellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.column() + 1)
    }
}

impl FromStr for WellAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WellAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.trim())
    }
}

impl From<WellAddress> for String {
    fn from(address: WellAddress) -> Self {
        address.to_string()
    }
}
