//! Error types for worksheet decoding, row deletion and report encoding

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type CommissionResult<T> = std::result::Result<T, CommissionError>;

/// Errors surfaced to the user as a single message
#[derive(Debug, Error)]
pub enum CommissionError {
    /// The spreadsheet codec could not read the input
    #[error("Failed to read spreadsheet {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The selected file is not a spreadsheet we can read
    #[error("Unsupported file '{0}'. Select an Excel file (.xlsx, .xls) or a CSV export")]
    UnsupportedFile(String),

    /// Row deletion with an index outside the table
    #[error("Row index {index} is out of range (table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The report could not be written
    #[error("Failed to write report {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

impl CommissionError {
    pub fn decode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CommissionError::Decode {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CommissionError::Encode {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
