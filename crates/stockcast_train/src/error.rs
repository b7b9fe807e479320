//! Error types for training, evaluation, and forecasting.

use thiserror::Error;

/// Result type alias for training operations.
pub type Result<T> = std::result::Result<T, TrainError>;

/// Errors that can occur during training and downstream use of its output.
#[derive(Error, Debug)]
pub enum TrainError {
    /// An operation required a trained model before one was available.
    #[error("No trained model available; run training first")]
    NotTrained,

    /// Forecast horizon must be at least one step.
    #[error("Invalid forecast horizon: {0}")]
    InvalidHorizon(usize),

    /// Data error.
    #[error("Data error: {0}")]
    DataError(#[from] stockcast_data::DataError),

    /// Core error.
    #[error("Core error: {0}")]
    CoreError(#[from] stockcast_core::CoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Training was interrupted.
    #[error("Training interrupted: {0}")]
    Interrupted(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}
