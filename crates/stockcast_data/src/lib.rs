//! # stockcast_data
//!
//! Tabular price data and sequence preprocessing for stockcast.
//!
//! This crate provides:
//! - [`PriceFrame`] for in-memory tabular data with named columns
//! - [`Preprocessor`] for min-max scaling and sliding-window extraction
//! - [`WindowDataset`] holding `(N, V, L)` windows with next-step labels
//! - [`ordered_split`] for temporal train/test splitting
//! - [`SeqDataLoader`] for batched, optionally shuffled iteration
//!
//! ## Shape Convention
//!
//! Window data is stored as `(N, V, L)`:
//! - `N`: Number of windows
//! - `V`: Variables/channels (1 for the univariate target)
//! - `L`: Sequence length (time steps)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod dataset;
mod error;
mod frame;
mod loader;
mod splits;
mod window;

pub use dataset::WindowDataset;
pub use error::{DataError, Result};
pub use frame::PriceFrame;
pub use loader::{SeqBatch, SeqDataLoader, SeqDataLoaderBuilder};
pub use splits::ordered_split;
pub use window::Preprocessor;
