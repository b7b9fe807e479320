//! Min-max normalization with invertible fitted state.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A min-max scaler mapping an observed value range onto a fixed output range.
///
/// The scaler is stateful: [`MinMaxScaler::fit`] records the observed minimum
/// and maximum, and every later [`transform`](MinMaxScaler::transform) or
/// [`inverse_transform`](MinMaxScaler::inverse_transform) uses that same
/// fitted state. Values outside the fitted range are mapped by the same
/// affine rule without clipping, so model outputs that extrapolate invert
/// cleanly back to the original scale.
///
/// # Example
///
/// ```rust
/// use stockcast_core::MinMaxScaler;
///
/// let mut scaler = MinMaxScaler::default();
/// let scaled = scaler.fit_transform(&[10.0, 20.0, 30.0]).unwrap();
/// assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
///
/// let restored = scaler.inverse_transform(&scaled).unwrap();
/// assert_eq!(restored, vec![10.0, 20.0, 30.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    low: f32,
    high: f32,
    fitted: Option<FittedRange>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FittedRange {
    min: f32,
    max: f32,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            fitted: None,
        }
    }
}

impl MinMaxScaler {
    /// Create a scaler with a custom output range.
    ///
    /// # Errors
    ///
    /// Returns an error if `low >= high`.
    pub fn with_range(low: f32, high: f32) -> Result<Self> {
        if low >= high {
            return Err(CoreError::InvalidRange { low, high });
        }
        Ok(Self {
            low,
            high,
            fitted: None,
        })
    }

    /// Whether the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Get the fitted (min, max) of the observed data, if any.
    #[must_use]
    pub fn data_range(&self) -> Option<(f32, f32)> {
        self.fitted.map(|r| (r.min, r.max))
    }

    /// Fit the scaler to the observed values.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty.
    pub fn fit(&mut self, values: &[f32]) -> Result<()> {
        if values.is_empty() {
            return Err(CoreError::EmptyInput);
        }
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        self.fitted = Some(FittedRange { min, max });
        Ok(())
    }

    /// Scale values using the fitted range.
    ///
    /// A constant fitted series (min == max) maps every value to the low end
    /// of the output range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFitted`] if [`fit`](Self::fit) has not been
    /// called.
    pub fn transform(&self, values: &[f32]) -> Result<Vec<f32>> {
        let range = self.fitted.ok_or(CoreError::NotFitted("MinMaxScaler"))?;
        let span = range.max - range.min;
        let out_span = self.high - self.low;
        Ok(values
            .iter()
            .map(|&v| {
                if span == 0.0 {
                    self.low
                } else {
                    self.low + (v - range.min) / span * out_span
                }
            })
            .collect())
    }

    /// Fit to the values, then scale them.
    pub fn fit_transform(&mut self, values: &[f32]) -> Result<Vec<f32>> {
        self.fit(values)?;
        self.transform(values)
    }

    /// Map scaled values back to the original scale.
    ///
    /// The inverse is the same affine map applied backwards; inputs outside
    /// the output range are not clipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFitted`] if [`fit`](Self::fit) has not been
    /// called.
    pub fn inverse_transform(&self, values: &[f32]) -> Result<Vec<f32>> {
        let range = self.fitted.ok_or(CoreError::NotFitted("MinMaxScaler"))?;
        let span = range.max - range.min;
        let out_span = self.high - self.low;
        Ok(values
            .iter()
            .map(|&v| range.min + (v - self.low) / out_span * span)
            .collect())
    }
}
