//! # stockcast_models
//!
//! Neural network architectures for price forecasting.
//!
//! The crate currently provides a single architecture:
//! - [`StackedLstm`] - two stacked LSTM layers with dropout and a small
//!   fully-connected regression head, producing one next-step value per
//!   input window.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod stacked_lstm;

pub use stacked_lstm::{StackedLstm, StackedLstmConfig};
