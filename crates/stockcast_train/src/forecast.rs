//! Autoregressive multi-step forecasting.

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainError};
use crate::worker::{FitResult, InferenceBackend};

/// One forecast step: a display label and a value in the original scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Calendar date when the series carried one, otherwise `Day N`.
    pub label: String,
    /// Forecast value in the original price scale.
    pub value: f32,
}

/// Forecast `horizon` steps past the end of the series.
///
/// Rolls the model forward autoregressively: the window starts as the
/// scaled tail of the full series, and each predicted value is appended
/// while the oldest is dropped. All predictions stay in the normalized
/// scale during the rollout and are inverted in one pass at the end, so a
/// forecast drifting outside the fitted range is preserved rather than
/// clamped.
pub fn forecast(result: &FitResult, horizon: usize) -> Result<Vec<ForecastPoint>> {
    if horizon == 0 {
        return Err(TrainError::InvalidHorizon(horizon));
    }

    let device = Default::default();
    let seq_len = result.scaled_tail.len();
    let mut window = result.scaled_tail.clone();
    let mut scaled_preds = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let x = Tensor::<InferenceBackend, 1>::from_floats(window.as_slice(), &device)
            .reshape([1, 1, seq_len]);
        let pred: f32 = result.model.forward(x).into_scalar().elem();

        scaled_preds.push(pred);
        window.remove(0);
        window.push(pred);
    }

    let values = result.preprocessor.scaler().inverse_transform(&scaled_preds)?;

    let points = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let step = (i + 1) as i64;
            let label = match result.last_date {
                Some(date) => (date + chrono::Duration::days(step))
                    .format("%Y-%m-%d")
                    .to_string(),
                None => format!("Day {step}"),
            };
            ForecastPoint { label, value }
        })
        .collect();

    tracing::info!(horizon, "forecast complete");

    Ok(points)
}
