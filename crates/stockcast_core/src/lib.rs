//! # stockcast_core
//!
//! Core types for the stockcast forecasting pipeline.
//!
//! This crate provides:
//! - [`Seed`] for deterministic random number generation
//! - [`MinMaxScaler`] for fitting and inverting target-column normalization
//! - Error types and common utilities

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod scaler;
mod seed;

pub use error::{CoreError, Result};
pub use scaler::MinMaxScaler;
pub use seed::Seed;
