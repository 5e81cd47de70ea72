//! Fatal errors for the transfer flows.
//!
//! Per-node store failures are not errors at this level; they are recorded
//! in a [`Report`](crate::Report) and processing continues.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TransferError {
    #[error("could not access {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported source format {path} (expected .xlsx, .xlsm, .xls, .ods or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("could not read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("sheet {sheet:?} is empty or has no data rows")]
    EmptySheet { sheet: String },

    #[error("required column {column:?} is missing from the header row")]
    MissingColumn { column: String },
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        TransferError::Io {
            path: path.into(),
            error,
        }
    }
}
