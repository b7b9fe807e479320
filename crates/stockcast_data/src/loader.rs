//! Batched iteration over window datasets.

use burn::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use stockcast_core::Seed;

use crate::dataset::WindowDataset;
use crate::error::{DataError, Result};

/// One batch of windows and labels as backend tensors.
#[derive(Debug, Clone)]
pub struct SeqBatch<B: Backend> {
    /// Input windows, shape `(batch, vars, seq_len)`.
    pub x: Tensor<B, 3>,
    /// Next-step labels, shape `(batch, 1)`.
    pub y: Tensor<B, 2>,
}

/// A dataloader that produces batches from a window dataset.
///
/// Batch order can be shuffled within each pass (training), while the
/// dataset itself keeps its temporal order; shuffling is deterministic
/// when a [`Seed`] is supplied.
///
/// # Example
///
/// ```rust,ignore
/// let loader = SeqDataLoader::builder(dataset)
///     .batch_size(32)
///     .shuffle(true)
///     .seed(Seed::new(42))
///     .build()?;
///
/// for batch in loader.iter::<B>(&device) {
///     let batch = batch?;
///     // forward pass on batch.x / batch.y
/// }
/// ```
pub struct SeqDataLoader {
    dataset: WindowDataset,
    batch_size: usize,
    shuffle: bool,
    seed: Option<Seed>,
}

impl SeqDataLoader {
    /// Create a new dataloader builder.
    #[must_use]
    pub fn builder(dataset: WindowDataset) -> SeqDataLoaderBuilder {
        SeqDataLoaderBuilder::new(dataset)
    }

    /// Get the dataset.
    #[must_use]
    pub fn dataset(&self) -> &WindowDataset {
        &self.dataset
    }

    /// Get the batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Get the number of batches per pass.
    #[must_use]
    pub fn n_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    /// Get the total number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Check if the loader is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Create an iterator over batches for one pass.
    ///
    /// Each call reshuffles (when shuffling is enabled), so consecutive
    /// epochs see different batch orders from the same seeded stream.
    #[must_use]
    pub fn iter<B: Backend>(&self, device: &B::Device, epoch: usize) -> SeqDataLoaderIter<'_, B> {
        SeqDataLoaderIter::new(self, device.clone(), epoch)
    }
}

/// Builder for [`SeqDataLoader`].
pub struct SeqDataLoaderBuilder {
    dataset: WindowDataset,
    batch_size: usize,
    shuffle: bool,
    seed: Option<Seed>,
}

impl SeqDataLoaderBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(dataset: WindowDataset) -> Self {
        Self {
            dataset,
            batch_size: 32,
            shuffle: false,
            seed: None,
        }
    }

    /// Set the batch size.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enable or disable shuffling of batch order.
    #[must_use]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the random seed for shuffling.
    #[must_use]
    pub fn seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the dataloader.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch size is zero or the dataset is empty.
    pub fn build(self) -> Result<SeqDataLoader> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidBatchSize(
                "Batch size must be greater than 0".to_string(),
            ));
        }
        if self.dataset.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        Ok(SeqDataLoader {
            dataset: self.dataset,
            batch_size: self.batch_size,
            shuffle: self.shuffle,
            seed: self.seed,
        })
    }
}

/// Iterator over batches from a [`SeqDataLoader`].
pub struct SeqDataLoaderIter<'a, B: Backend> {
    loader: &'a SeqDataLoader,
    device: B::Device,
    indices: Vec<usize>,
    current_batch: usize,
    n_batches: usize,
}

impl<'a, B: Backend> SeqDataLoaderIter<'a, B> {
    fn new(loader: &'a SeqDataLoader, device: B::Device, epoch: usize) -> Self {
        let mut indices: Vec<usize> = (0..loader.dataset.len()).collect();

        if loader.shuffle {
            let mut rng = match loader.seed {
                Some(seed) => seed.derive(&format!("epoch-{epoch}")).to_rng(),
                None => ChaCha8Rng::from_entropy(),
            };
            indices.shuffle(&mut rng);
        }

        Self {
            loader,
            device,
            indices,
            current_batch: 0,
            n_batches: loader.n_batches(),
        }
    }

    fn create_batch(&self, indices: &[usize]) -> Result<SeqBatch<B>> {
        let dataset = &self.loader.dataset;
        let batch_size = indices.len();
        let n_vars = dataset.n_vars();
        let seq_len = dataset.seq_len();

        let mut x_flat = Vec::with_capacity(batch_size * n_vars * seq_len);
        let mut y_flat = Vec::with_capacity(batch_size);

        for &idx in indices {
            let (x_sample, y_sample) = dataset.get(idx)?;
            x_flat.extend(x_sample.iter().copied());
            y_flat.push(y_sample[0]);
        }

        let x: Tensor<B, 3> = Tensor::<B, 1>::from_floats(x_flat.as_slice(), &self.device)
            .reshape([batch_size, n_vars, seq_len]);
        let y: Tensor<B, 2> = Tensor::<B, 1>::from_floats(y_flat.as_slice(), &self.device)
            .reshape([batch_size, 1]);

        Ok(SeqBatch { x, y })
    }
}

impl<'a, B: Backend> Iterator for SeqDataLoaderIter<'a, B> {
    type Item = Result<SeqBatch<B>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_batch >= self.n_batches {
            return None;
        }

        let start = self.current_batch * self.loader.batch_size;
        let end = std::cmp::min(start + self.loader.batch_size, self.indices.len());
        let batch_indices: Vec<usize> = self.indices[start..end].to_vec();

        self.current_batch += 1;

        Some(self.create_batch(&batch_indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n_batches - self.current_batch;
        (remaining, Some(remaining))
    }
}

impl<'a, B: Backend> ExactSizeIterator for SeqDataLoaderIter<'a, B> {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    type TestBackend = burn::backend::NdArray;

    fn make_dataset(n: usize) -> WindowDataset {
        let mut x = Array3::zeros((n, 1, 8));
        let mut y = Array2::zeros((n, 1));
        for i in 0..n {
            y[[i, 0]] = i as f32;
            for t in 0..8 {
                x[[i, 0, t]] = i as f32;
            }
        }
        WindowDataset::from_arrays(x, y).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let loader = SeqDataLoader::builder(make_dataset(100)).build().unwrap();
        assert_eq!(loader.batch_size(), 32);
        assert_eq!(loader.n_batches(), 4); // ceil(100/32)
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = SeqDataLoader::builder(make_dataset(10)).batch_size(0).build();
        assert!(matches!(result, Err(DataError::InvalidBatchSize(_))));
    }

    #[test]
    fn test_unshuffled_iteration_preserves_order() {
        let loader = SeqDataLoader::builder(make_dataset(10))
            .batch_size(4)
            .build()
            .unwrap();
        let device = Default::default();

        let mut seen = Vec::new();
        for batch in loader.iter::<TestBackend>(&device, 0) {
            let batch = batch.unwrap();
            let values: Vec<f32> = batch.y.into_data().to_vec().unwrap();
            seen.extend(values);
        }
        let expected: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_shuffle_is_deterministic_per_seed_and_epoch() {
        let collect = |epoch: usize| -> Vec<f32> {
            let loader = SeqDataLoader::builder(make_dataset(20))
                .batch_size(5)
                .shuffle(true)
                .seed(Seed::new(42))
                .build()
                .unwrap();
            let device = Default::default();
            let mut seen = Vec::new();
            for batch in loader.iter::<TestBackend>(&device, epoch) {
                let values: Vec<f32> = batch.unwrap().y.into_data().to_vec().unwrap();
                seen.extend(values);
            }
            seen
        };

        assert_eq!(collect(0), collect(0));
        assert_ne!(collect(0), collect(1));
    }

    #[test]
    fn test_batch_shapes() {
        let loader = SeqDataLoader::builder(make_dataset(10))
            .batch_size(4)
            .build()
            .unwrap();
        let device = Default::default();
        let batches: Vec<_> = loader
            .iter::<TestBackend>(&device, 0)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].x.dims(), [4, 1, 8]);
        assert_eq!(batches[0].y.dims(), [4, 1]);
        // Last batch is the remainder.
        assert_eq!(batches[2].x.dims(), [2, 1, 8]);
    }
}
