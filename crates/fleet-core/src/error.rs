//! Error types for the fleet-core library.

use thiserror::Error;

/// Main error type for the fleet library.
#[derive(Error, Debug)]
pub enum FleetError {
    /// The inventory input could not be used.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the inventory input table.
#[derive(Error, Debug)]
pub enum InputError {
    /// A required column is not present in the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// The table has no header row.
    #[error("input has no header row")]
    Empty,

    /// A row could not be read.
    #[error("failed to read row {row}: {reason}")]
    Read { row: u64, reason: String },
}

/// Result type for the fleet library.
pub type Result<T> = std::result::Result<T, FleetError>;
