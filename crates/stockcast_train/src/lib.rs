//! # stockcast_train
//!
//! Training loop, background worker, evaluation, and forecasting.
//!
//! This crate provides:
//! - [`RegressionTrainer`] - MSE training with early stopping and best-weight restore
//! - [`spawn_training`] - full pipeline on a background thread with
//!   progress and cancellation over a channel
//! - [`ForecastSession`] - gated access to the latest training result
//! - [`evaluate`] - held-out metrics (MSE, RMSE, MAE) in the original scale
//! - [`forecast`] - autoregressive multi-step forecasting
//!
//! ## Example
//!
//! ```rust,ignore
//! use stockcast_train::{spawn_training, CancelToken, TrainEvent, TrainSpec};
//!
//! let spec = TrainSpec::new(frame, "Close");
//! let cancel = CancelToken::new();
//! let (events, handle) = spawn_training(spec, cancel.clone());
//!
//! for event in events {
//!     match event {
//!         TrainEvent::Progress(p) => println!("{p}%"),
//!         TrainEvent::Completed(result) => { /* evaluate / forecast */ }
//!         TrainEvent::Failed(err) => eprintln!("{err}"),
//!         TrainEvent::Cancelled => break,
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod evaluation;
pub mod forecast;
pub mod progress;
pub mod session;
pub mod trainer;
pub mod worker;

pub use error::{Result, TrainError};
pub use evaluation::{evaluate, regression_metrics, Evaluation, Metrics};
pub use forecast::{forecast, ForecastPoint};
pub use progress::{CancelToken, CollectSink, NullSink, ProgressSink};
pub use session::ForecastSession;
pub use trainer::{RegressionTrainer, RegressionTrainerConfig, TrainingOutput};
pub use worker::{
    run_training, spawn_training, FitResult, InferenceBackend, TrainBackend, TrainEvent, TrainSpec,
};
