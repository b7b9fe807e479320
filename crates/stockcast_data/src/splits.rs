//! Temporal dataset splitting.

use crate::error::{DataError, Result};
use crate::WindowDataset;

/// Split a window dataset into a training prefix and a test suffix.
///
/// The split point is `floor(n * (1 - test_size))`; window order is never
/// shuffled, so every training window strictly precedes every test window
/// in the original temporal order.
///
/// # Arguments
///
/// * `dataset` - The windows to split
/// * `test_size` - Fraction held out at the end, in `(0, 1)`
///
/// # Returns
///
/// A tuple of (train_dataset, test_dataset).
pub fn ordered_split(
    dataset: &WindowDataset,
    test_size: f32,
) -> Result<(WindowDataset, WindowDataset)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DataError::InvalidTestSize(test_size));
    }
    if dataset.is_empty() {
        return Err(DataError::EmptyDataset);
    }

    let n = dataset.len();
    let split_idx = (n as f32 * (1.0 - test_size)).floor() as usize;

    let train = dataset.slice_range(0, split_idx)?;
    let test = dataset.slice_range(split_idx, n)?;

    tracing::debug!(train = train.len(), test = test.len(), "ordered split");

    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    fn indexed_dataset(n: usize) -> WindowDataset {
        // Each window is filled with its own index so order is observable.
        let mut x = Array3::zeros((n, 1, 4));
        let mut y = Array2::zeros((n, 1));
        for i in 0..n {
            for t in 0..4 {
                x[[i, 0, t]] = i as f32;
            }
            y[[i, 0]] = i as f32;
        }
        WindowDataset::from_arrays(x, y).unwrap()
    }

    #[test]
    fn test_split_counts() {
        let ds = indexed_dataset(90);
        let (train, test) = ordered_split(&ds, 0.2).unwrap();
        assert_eq!(train.len(), 72);
        assert_eq!(test.len(), 18);
        assert_eq!(train.len() + test.len(), ds.len());
    }

    #[test]
    fn test_split_preserves_order() {
        let ds = indexed_dataset(10);
        let (train, test) = ordered_split(&ds, 0.3).unwrap();

        // Train is the prefix, test the suffix, both in original order.
        for i in 0..train.len() {
            assert_eq!(train.y()[[i, 0]], i as f32);
        }
        for i in 0..test.len() {
            assert_eq!(test.y()[[i, 0]], (train.len() + i) as f32);
        }
    }

    #[test]
    fn test_invalid_test_size() {
        let ds = indexed_dataset(10);
        assert!(matches!(
            ordered_split(&ds, 0.0),
            Err(DataError::InvalidTestSize(_))
        ));
        assert!(matches!(
            ordered_split(&ds, 1.0),
            Err(DataError::InvalidTestSize(_))
        ));
        assert!(matches!(
            ordered_split(&ds, -0.5),
            Err(DataError::InvalidTestSize(_))
        ));
    }
}
