//! Broker import error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic for one rejected row of an import file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// Zero-based data row index (header row excluded).
    pub row_index: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            message: message.into(),
        }
    }
}

/// Errors that reject an import file wholesale.
///
/// These fire during the parse/validation pass, before any row reaches
/// storage. Per-ticker quote lookup failures are *not* import errors; they
/// surface as `error` markers on the enriched holding view.
#[derive(Error, Debug)]
pub enum ImportError {
    /// No recognizable ticker symbol column in the header row.
    #[error("No ticker symbol column found (expected one of: {0})")]
    MissingSymbolColumn(String),

    /// One or more rows failed to parse; nothing was imported.
    #[error("{} of {row_count} rows are malformed; nothing was imported", .row_errors.len())]
    Malformed {
        row_count: usize,
        row_errors: Vec<RowError>,
    },

    /// The file decoded fine but contains no data rows.
    #[error("Import file contains no holdings")]
    Empty,
}
