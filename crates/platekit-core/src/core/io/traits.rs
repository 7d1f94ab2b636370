use super::sheet::ExportTable;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Remote sheet error: {0}")]
    Remote(String),

    #[error("Export sink '{sink}' is unavailable: {reason}")]
    Unavailable { sink: String, reason: String },
}

/// Where a successful export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    /// Sink name, as reported by [`ExportSink::name`].
    pub sink: String,
    /// A human-readable location: a file path, a worksheet title, a URL.
    pub location: String,
}

/// Defines the interface for one-way plate export destinations.
///
/// Sinks receive a plate that has already been built, categorized and (optionally) analyzed,
/// flattened into an [`ExportTable`]. They never modify plate data, and a failing sink must not
/// affect any other part of a save.
pub trait ExportSink {
    /// A short, stable name used in logs and user-facing warnings.
    fn name(&self) -> &str;

    /// Writes the table to the destination.
    ///
    /// # Arguments
    ///
    /// * `table` - The plate rows, including the header, to write.
    ///
    /// # Return
    ///
    /// Returns an [`ExportReceipt`] describing where the table was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be reached or written; callers treat this as
    /// a warning.
    fn export(&self, table: &ExportTable) -> Result<ExportReceipt, ExportError>;
}
