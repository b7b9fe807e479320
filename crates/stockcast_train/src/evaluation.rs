//! Held-out evaluation of a trained model.

use serde::{Deserialize, Serialize};

use stockcast_data::SeqDataLoader;

use crate::error::Result;
use crate::worker::{FitResult, InferenceBackend};

/// Regression error metrics, all in the original price scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean squared error.
    pub mse: f32,
    /// Root mean squared error.
    pub rmse: f32,
    /// Mean absolute error.
    pub mae: f32,
}

/// Evaluation output: metrics plus the aligned series behind them.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Error metrics on the held-out windows.
    pub metrics: Metrics,
    /// Actual next-step values, original scale, temporal order.
    pub actual: Vec<f32>,
    /// Predicted next-step values, aligned with `actual`.
    pub predicted: Vec<f32>,
}

/// Compute MSE, RMSE, and MAE over aligned series.
///
/// Both slices must be non-empty and of equal length; callers in this
/// crate guarantee that by construction.
#[must_use]
pub fn regression_metrics(actual: &[f32], predicted: &[f32]) -> Metrics {
    let n = actual.len() as f32;
    let mut sq_sum = 0.0f32;
    let mut abs_sum = 0.0f32;
    for (&a, &p) in actual.iter().zip(predicted) {
        let diff = p - a;
        sq_sum += diff * diff;
        abs_sum += diff.abs();
    }
    let mse = sq_sum / n;
    Metrics {
        mse,
        rmse: mse.sqrt(),
        mae: abs_sum / n,
    }
}

/// Evaluate a training result on its held-out windows.
///
/// Runs the model over the test windows in temporal order, inverts the
/// scaling on both predictions and labels, and computes metrics in the
/// original price scale.
pub fn evaluate(result: &FitResult) -> Result<Evaluation> {
    let device = Default::default();
    let loader = SeqDataLoader::builder(result.test.clone()).build()?;

    let mut scaled_preds = Vec::with_capacity(result.test.len());
    for batch_result in loader.iter::<InferenceBackend>(&device, 0) {
        let batch = batch_result?;
        let preds = result.model.forward(batch.x);
        let values: Vec<f32> = preds
            .into_data()
            .to_vec()
            .map_err(|e| crate::error::TrainError::Other(format!("tensor readback: {e:?}")))?;
        scaled_preds.extend(values);
    }

    let scaled_actual: Vec<f32> = result.test.y().iter().copied().collect();

    let scaler = result.preprocessor.scaler();
    let predicted = scaler.inverse_transform(&scaled_preds)?;
    let actual = scaler.inverse_transform(&scaled_actual)?;

    let metrics = regression_metrics(&actual, &predicted);
    tracing::info!(
        windows = actual.len(),
        mse = metrics.mse,
        rmse = metrics.rmse,
        mae = metrics.mae,
        "evaluated on held-out windows"
    );

    Ok(Evaluation {
        metrics,
        actual,
        predicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_perfect_prediction() {
        let actual = vec![1.0, 2.0, 3.0];
        let m = regression_metrics(&actual, &actual);
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
    }

    #[test]
    fn test_metrics_known_values() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        let predicted = vec![2.0, 2.0, 2.0, 2.0];
        let m = regression_metrics(&actual, &predicted);
        // errors: 1, 0, -1, -2
        assert!((m.mse - 1.5).abs() < 1e-6);
        assert!((m.rmse - 1.5f32.sqrt()).abs() < 1e-6);
        assert!((m.mae - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rmse_is_sqrt_mse() {
        let actual = vec![10.0, 20.0, 30.0];
        let predicted = vec![12.0, 17.0, 33.0];
        let m = regression_metrics(&actual, &predicted);
        assert!((m.rmse - m.mse.sqrt()).abs() < 1e-6);
    }
}
