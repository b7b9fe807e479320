//! # stockcast
//!
//! LSTM price forecasting in Rust.
//!
//! stockcast turns a series of historical prices into next-step forecasts:
//!
//! - **Data handling**: CSV loading, min-max scaling, sliding-window extraction
//! - **Model**: stacked LSTM with a small regression head
//! - **Training**: background worker with progress and cancellation
//! - **Evaluation**: MSE, RMSE, and MAE on held-out windows
//! - **Forecasting**: autoregressive multi-step rollout with date labels
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockcast::prelude::*;
//!
//! // Load data
//! let frame = PriceFrame::from_csv("prices.csv")?;
//!
//! // Train in the background
//! let mut spec = TrainSpec::new(frame, "Close");
//! spec.date_col = Some("Date".to_string());
//! let cancel = CancelToken::new();
//! let (events, handle) = spawn_training(spec, cancel.clone());
//!
//! let mut session = ForecastSession::new();
//! for event in events {
//!     match event {
//!         TrainEvent::Progress(p) => println!("{p}%"),
//!         TrainEvent::Completed(result) => session.install(*result),
//!         TrainEvent::Failed(err) => eprintln!("training failed: {err}"),
//!         TrainEvent::Cancelled => println!("cancelled"),
//!     }
//! }
//!
//! // Evaluate and forecast
//! let result = session.result()?;
//! let eval = evaluate(result)?;
//! println!("RMSE: {:.2}", eval.metrics.rmse);
//! let points = forecast(result, 30)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use stockcast_core as core;
pub use stockcast_data as data;
pub use stockcast_models as models;
pub use stockcast_train as train;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use stockcast::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use stockcast_core::{MinMaxScaler, Seed};

    // Data
    pub use stockcast_data::{
        ordered_split, PriceFrame, Preprocessor, SeqDataLoader, WindowDataset,
    };

    // Models
    pub use stockcast_models::{StackedLstm, StackedLstmConfig};

    // Training and inference
    pub use stockcast_train::{
        evaluate, forecast, spawn_training, CancelToken, Evaluation, FitResult, ForecastPoint,
        ForecastSession, Metrics, TrainEvent, TrainSpec,
    };
}
