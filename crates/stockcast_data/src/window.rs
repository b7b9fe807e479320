//! Target-column preprocessing: scaling and sliding-window extraction.

use ndarray::{Array2, Array3};

use stockcast_core::MinMaxScaler;

use crate::error::{DataError, Result};
use crate::frame::PriceFrame;
use crate::WindowDataset;

/// Turns a raw price frame into normalized fixed-length window/label pairs.
///
/// The preprocessor extracts the designated target column, fits a
/// [`MinMaxScaler`] over the full column, and slides a window of
/// `seq_length` across the scaled series with stride 1. For a column of
/// length `N` this yields exactly `N - seq_length` windows, window `i`
/// covering `scaled[i..i + seq_length]` with label `scaled[i + seq_length]`.
///
/// The fitted scaler is the only state this component keeps; it must be
/// retained for later inversion of predictions.
///
/// # Example
///
/// ```rust,ignore
/// let mut pre = Preprocessor::new("Close", 60);
/// let windows = pre.preprocess(&frame)?;
/// let restored = pre.scaler().inverse_transform(&predictions)?;
/// ```
#[derive(Debug, Clone)]
pub struct Preprocessor {
    target_col: String,
    seq_length: usize,
    scaler: MinMaxScaler,
}

impl Preprocessor {
    /// Create a preprocessor for the given target column and window length.
    #[must_use]
    pub fn new(target_col: &str, seq_length: usize) -> Self {
        Self {
            target_col: target_col.to_string(),
            seq_length,
            scaler: MinMaxScaler::default(),
        }
    }

    /// The designated target column name.
    #[must_use]
    pub fn target_col(&self) -> &str {
        &self.target_col
    }

    /// The configured window length.
    #[must_use]
    pub fn seq_length(&self) -> usize {
        self.seq_length
    }

    /// The scaler, fitted once [`preprocess`](Self::preprocess) has run.
    #[must_use]
    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Extract, scale, and window the target column.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the column is missing or
    /// non-numeric, if `seq_length` is zero, or if the series is too short
    /// to form at least one window.
    pub fn preprocess(&mut self, frame: &PriceFrame) -> Result<WindowDataset> {
        if self.seq_length == 0 {
            return Err(DataError::SeriesTooShort {
                len: frame.n_rows(),
                seq_length: 0,
            });
        }

        let series = frame.numeric_column(&self.target_col)?;
        if series.len() <= self.seq_length {
            return Err(DataError::SeriesTooShort {
                len: series.len(),
                seq_length: self.seq_length,
            });
        }

        // Fitted over the full column before any split; the min/max
        // therefore include held-out values.
        let scaled = self.scaler.fit_transform(&series)?;

        let n_windows = scaled.len() - self.seq_length;
        let mut x = Array3::<f32>::zeros((n_windows, 1, self.seq_length));
        let mut y = Array2::<f32>::zeros((n_windows, 1));

        for i in 0..n_windows {
            for (t, &v) in scaled[i..i + self.seq_length].iter().enumerate() {
                x[[i, 0, t]] = v;
            }
            y[[i, 0]] = scaled[i + self.seq_length];
        }

        tracing::debug!(
            target = %self.target_col,
            rows = series.len(),
            windows = n_windows,
            seq_length = self.seq_length,
            "preprocessed target column"
        );

        WindowDataset::from_arrays(x, y)
    }

    /// Scale the trailing `seq_length` raw values of the target column.
    ///
    /// This is the seed sequence for autoregressive forecasting; it uses the
    /// scaler fitted during [`preprocess`](Self::preprocess).
    pub fn scaled_tail(&self, frame: &PriceFrame) -> Result<Vec<f32>> {
        let series = frame.numeric_column(&self.target_col)?;
        if series.len() < self.seq_length {
            return Err(DataError::SeriesTooShort {
                len: series.len(),
                seq_length: self.seq_length,
            });
        }
        let tail = &series[series.len() - self.seq_length..];
        Ok(self.scaler.transform(tail)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_frame(n: usize) -> PriceFrame {
        PriceFrame::from_columns(vec![(
            "Close".to_string(),
            (1..=n).map(|v| v.to_string()).collect(),
        )])
        .unwrap()
    }

    #[test]
    fn test_window_count_and_shapes() {
        let frame = ramp_frame(100);
        let mut pre = Preprocessor::new("Close", 10);
        let ds = pre.preprocess(&frame).unwrap();
        assert_eq!(ds.len(), 90);
        assert_eq!(ds.n_vars(), 1);
        assert_eq!(ds.seq_len(), 10);
    }

    #[test]
    fn test_window_values_match_scaled_series() {
        let frame = ramp_frame(20);
        let mut pre = Preprocessor::new("Close", 5);
        let ds = pre.preprocess(&frame).unwrap();

        let series: Vec<f32> = (1..=20).map(|v| v as f32).collect();
        let scaled = {
            let mut scaler = MinMaxScaler::default();
            scaler.fit_transform(&series).unwrap()
        };

        // Window i equals scaled[i..i+L]; label i equals scaled[i+L].
        for i in 0..ds.len() {
            let (x, y) = ds.get(i).unwrap();
            for t in 0..5 {
                assert!((x[[0, t]] - scaled[i + t]).abs() < 1e-6);
            }
            assert!((y[0] - scaled[i + 5]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_series_too_short() {
        let frame = ramp_frame(10);
        let mut pre = Preprocessor::new("Close", 10);
        assert!(matches!(
            pre.preprocess(&frame),
            Err(DataError::SeriesTooShort {
                len: 10,
                seq_length: 10
            })
        ));
    }

    #[test]
    fn test_non_numeric_target() {
        let frame = PriceFrame::from_columns(vec![(
            "Close".to_string(),
            vec!["1.0".into(), "oops".into(), "3.0".into()],
        )])
        .unwrap();
        let mut pre = Preprocessor::new("Close", 1);
        assert!(matches!(
            pre.preprocess(&frame),
            Err(DataError::NonNumeric { row: 1, .. })
        ));
    }

    #[test]
    fn test_scaler_fitted_after_preprocess() {
        let frame = ramp_frame(50);
        let mut pre = Preprocessor::new("Close", 5);
        assert!(!pre.scaler().is_fitted());
        pre.preprocess(&frame).unwrap();
        assert_eq!(pre.scaler().data_range(), Some((1.0, 50.0)));
    }

    #[test]
    fn test_scaled_tail() {
        let frame = ramp_frame(50);
        let mut pre = Preprocessor::new("Close", 5);
        pre.preprocess(&frame).unwrap();
        let tail = pre.scaled_tail(&frame).unwrap();
        assert_eq!(tail.len(), 5);
        // The last raw value is the fitted maximum.
        assert!((tail[4] - 1.0).abs() < 1e-6);
    }
}
