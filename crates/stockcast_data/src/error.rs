//! Error types for stockcast_data.

use thiserror::Error;

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur in data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// A named column does not exist in the frame.
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A cell in a numeric column failed to parse.
    #[error("Column '{column}' is not numeric: '{cell}' at row {row}")]
    NonNumeric {
        /// The offending column name.
        column: String,
        /// The raw cell content.
        cell: String,
        /// Zero-based row index of the offending cell.
        row: usize,
    },

    /// A cell in a date column failed to parse.
    #[error("Column '{column}' is not a date column: '{cell}' at row {row}")]
    InvalidDate {
        /// The offending column name.
        column: String,
        /// The raw cell content.
        cell: String,
        /// Zero-based row index of the offending cell.
        row: usize,
    },

    /// The target series is too short to form any window.
    #[error("Series of length {len} is too short for sequence length {seq_length}")]
    SeriesTooShort {
        /// Number of rows in the target column.
        len: usize,
        /// Requested window length.
        seq_length: usize,
    },

    /// Invalid test fraction.
    #[error("test_size must be in (0, 1), got {0}")]
    InvalidTestSize(f32),

    /// Invalid data shape.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Empty dataset.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Index out of bounds.
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the collection.
        length: usize,
    },

    /// Batch size error.
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(String),

    /// CSV parse error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Core error.
    #[error("Core error: {0}")]
    CoreError(#[from] stockcast_core::CoreError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}
