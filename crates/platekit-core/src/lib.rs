//! # platekit Core Library
//!
//! A library for managing 96-well ELISA plate results: well addressing, control/sample category
//! assignment, blank-subtraction normalization and threshold-based positive/negative
//! classification.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture to keep concerns separate and every
//! layer independently testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`WellAddress`, `PlateTable`), the text
//!   and CSV plate formats, tabular export sinks, and the SQLite plate store.
//!
//! - **[`engine`]: The Logic Core.** Category assignment with last-write-wins semantics, blank
//!   normalization, threshold derivation and classification, together with their configuration,
//!   progress reporting and error types.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie the `engine` and `core`
//!   together: analyzing a plate and saving it to storage and export sinks.

pub mod core;
pub mod engine;
pub mod workflows;
