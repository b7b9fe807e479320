//! Error types for stockcast_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur in stockcast_core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation required a fitted component that has not been fitted yet.
    #[error("{0} has not been fitted yet")]
    NotFitted(&'static str),

    /// Invalid scaler output range.
    #[error("Invalid scaler range: low {low} must be strictly less than high {high}")]
    InvalidRange {
        /// Lower bound of the requested output range.
        low: f32,
        /// Upper bound of the requested output range.
        high: f32,
    },

    /// A value sequence required for fitting was empty.
    #[error("Cannot fit on an empty sequence")]
    EmptyInput,

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
