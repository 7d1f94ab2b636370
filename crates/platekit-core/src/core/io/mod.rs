//! Provides input/output functionality for plate data.
//!
//! Plates enter the library either as two pasted free-text tables (sample names and values) or
//! as a CSV layout with one row per well, and leave it through export sinks that receive the
//! already-computed plate as a flat table. All sinks share the [`traits::ExportSink`] interface.

pub mod layout;
pub mod sheet;
pub mod traits;
