//! # Workflows Module
//!
//! High-level entry points that sequence the engine and the I/O layers for one plate.
//!
//! - **Analysis Workflow** ([`analyze`]) - Blank normalization followed by threshold
//!   classification, reported as two progress phases.
//! - **Save Workflow** ([`save`]) - Persists a plate and then hands it to every configured export
//!   sink. Sink failures are collected as warnings and never undo the save.
//!
//! Workflows own no state of their own. Front-ends build the plate, pick the sinks and render
//! the returned reports.

pub mod analyze;
pub mod save;
