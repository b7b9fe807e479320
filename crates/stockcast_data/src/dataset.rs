//! Windowed sequence dataset types.

use ndarray::{Array2, Array3};

use crate::error::{DataError, Result};

/// A dataset of fixed-length sequence windows with next-step labels.
///
/// Windows are stored in the `(N, V, L)` format:
/// - `N`: Number of windows
/// - `V`: Variables/channels (1 for the univariate target)
/// - `L`: Sequence length
///
/// Labels are `(N, 1)`: the single normalized value immediately following
/// each window. Window order is the original temporal order of the series.
#[derive(Debug, Clone)]
pub struct WindowDataset {
    /// Input windows (N, V, L)
    x: Array3<f32>,
    /// Next-step labels (N, 1)
    y: Array2<f32>,
}

impl WindowDataset {
    /// Create a dataset from window and label arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch dimensions don't match.
    pub fn from_arrays(x: Array3<f32>, y: Array2<f32>) -> Result<Self> {
        if x.shape()[0] != y.shape()[0] {
            return Err(DataError::InvalidShape(format!(
                "x has {} windows but y has {} labels",
                x.shape()[0],
                y.shape()[0]
            )));
        }
        Ok(Self { x, y })
    }

    /// Get the number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.shape()[0]
    }

    /// Check if the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of variables.
    #[must_use]
    pub fn n_vars(&self) -> usize {
        self.x.shape()[1]
    }

    /// Get the window length.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.x.shape()[2]
    }

    /// Get a reference to the input windows.
    #[must_use]
    pub fn x(&self) -> &Array3<f32> {
        &self.x
    }

    /// Get a reference to the labels.
    #[must_use]
    pub fn y(&self) -> &Array2<f32> {
        &self.y
    }

    /// Get one window and its label by index.
    pub fn get(
        &self,
        index: usize,
    ) -> Result<(ndarray::ArrayView2<'_, f32>, ndarray::ArrayView1<'_, f32>)> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds {
                index,
                length: self.len(),
            });
        }
        let x = self.x.index_axis(ndarray::Axis(0), index);
        let y = self.y.index_axis(ndarray::Axis(0), index);
        Ok((x, y))
    }

    /// Split off a contiguous range of windows, preserving order.
    pub(crate) fn slice_range(&self, start: usize, end: usize) -> Result<Self> {
        if end > self.len() || start > end {
            return Err(DataError::IndexOutOfBounds {
                index: end,
                length: self.len(),
            });
        }
        let x = self
            .x
            .slice(ndarray::s![start..end, .., ..])
            .to_owned();
        let y = self.y.slice(ndarray::s![start..end, ..]).to_owned();
        Ok(Self { x, y })
    }
}
