use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce the transaction table at startup.
///
/// Every variant is fatal for the dashboard: the session never reaches the
/// ready state without a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("workbook not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read workbook {}: {reason}", .path.display())]
    Workbook { path: PathBuf, reason: String },

    #[error("sheet `{sheet}` not found (available: {available:?})")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("required column `{0}` is missing from the header row")]
    MissingColumn(String),

    #[error("row {row}: `{value}` is not a HH:MM:SS time")]
    InvalidTime { row: u32, value: String },

    #[error("row {row}: `{value}` in column `{column}` is not a number")]
    InvalidNumber {
        row: u32,
        column: String,
        value: String,
    },

    #[error("row {row}: column `{column}` is empty")]
    MissingValue { row: u32, column: String },

    #[error("invalid sheet layout: {0}")]
    InvalidLayout(String),
}
