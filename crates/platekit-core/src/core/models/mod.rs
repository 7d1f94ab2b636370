//! # Core Models Module
//!
//! The data structures used to represent an assay plate.
//!
//! ## Key Components
//!
//! - [`address`] - Plate coordinates (`A1`..`H12`) and their zero-based grid indices
//! - [`category`] - The biological role assigned to a well
//! - [`well`] - A single well record with its raw and derived values
//! - [`plate`] - The complete 96-well plate grid
//!
//! ## Usage
//!
//! ```ignore
//! use platekit::core::models::{address::WellAddress, plate::PlateTable};
//!
//! let mut plate = PlateTable::new("plate-01");
//! let a1: WellAddress = "a1".parse()?;
//! plate.set_raw_value(a1, Some(0.42));
//! ```

pub mod address;
pub mod category;
pub mod plate;
pub mod well;
