//! Regression training loop with early stopping and cancellation.

use std::time::Instant;

use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use stockcast_data::SeqDataLoader;

use crate::error::Result;
use crate::progress::{CancelToken, ProgressSink};

/// Configuration for regression training.
#[derive(Debug, Clone)]
pub struct RegressionTrainerConfig {
    /// Number of epochs.
    pub n_epochs: usize,
    /// Learning rate.
    pub lr: f64,
    /// Early stopping patience on training loss (0 = disabled).
    pub early_stopping_patience: usize,
    /// Minimum improvement counted against the patience window.
    pub early_stopping_min_delta: f32,
}

impl Default for RegressionTrainerConfig {
    fn default() -> Self {
        Self {
            n_epochs: 50,
            lr: 1e-3,
            early_stopping_patience: 5,
            early_stopping_min_delta: 0.0,
        }
    }
}

/// Training output with metrics and final model.
#[derive(Debug)]
pub struct TrainingOutput<M> {
    /// The model with the lowest training loss seen during the run.
    pub model: M,
    /// Training losses per completed epoch.
    pub train_losses: Vec<f32>,
    /// Lowest training loss.
    pub best_train_loss: f32,
    /// Epoch index of the lowest training loss.
    pub best_epoch: usize,
    /// Number of epochs that actually ran.
    pub epochs_run: usize,
    /// Whether the run was stopped by cancellation.
    pub cancelled: bool,
    /// Total training time in seconds.
    pub training_time_secs: f64,
}

/// Trainer for next-step regression models.
///
/// Minimizes MSE with Adam, monitors the training loss for early stopping,
/// and restores the best weights seen so far when stopping (early, at the
/// epoch limit, or on cancellation).
pub struct RegressionTrainer<B: AutodiffBackend> {
    config: RegressionTrainerConfig,
    device: B::Device,
}

impl<B: AutodiffBackend> RegressionTrainer<B> {
    /// Create a new trainer.
    pub fn new(config: RegressionTrainerConfig, device: B::Device) -> Self {
        Self { config, device }
    }

    /// Train a regression model using a forward function.
    ///
    /// Progress is reported to `sink` after each completed epoch as
    /// `floor((epoch + 1) * 100 / n_epochs)`. The cancel token is polled
    /// before each epoch; a cancelled run returns the best model so far
    /// with `cancelled` set, it is not an error.
    pub fn fit_with_forward<M, F>(
        &self,
        model: M,
        loader: &SeqDataLoader,
        sink: &mut dyn ProgressSink,
        cancel: &CancelToken,
        forward_fn: F,
    ) -> Result<TrainingOutput<M>>
    where
        M: AutodiffModule<B> + Clone,
        F: Fn(&M, Tensor<B, 3>) -> Tensor<B, 2>,
    {
        let start_time = Instant::now();

        let mut optim = AdamConfig::new().init::<B, M>();

        let mut best_model = model.clone();
        let mut best_train_loss = f32::INFINITY;
        let mut best_epoch = 0;

        let mut train_losses = Vec::with_capacity(self.config.n_epochs);
        let mut current_model = model;

        let mut epochs_without_improvement = 0;
        let early_stopping_enabled = self.config.early_stopping_patience > 0;
        let mut cancelled = false;

        for epoch in 0..self.config.n_epochs {
            if cancel.is_cancelled() {
                cancelled = true;
                tracing::info!(epoch, "training cancelled");
                break;
            }

            let train_loss =
                self.train_epoch(&mut current_model, &mut optim, loader, epoch, &forward_fn)?;
            train_losses.push(train_loss);

            let improved = train_loss < best_train_loss - self.config.early_stopping_min_delta;
            if improved {
                best_train_loss = train_loss;
                best_epoch = epoch;
                best_model = current_model.clone();
                epochs_without_improvement = 0;
            } else {
                epochs_without_improvement += 1;
            }

            let percent = ((epoch + 1) * 100 / self.config.n_epochs) as u8;
            sink.report(percent);

            tracing::debug!(
                epoch = epoch + 1,
                n_epochs = self.config.n_epochs,
                train_loss,
                improved,
                "epoch complete"
            );

            if early_stopping_enabled
                && epochs_without_improvement >= self.config.early_stopping_patience
            {
                tracing::info!(
                    patience = self.config.early_stopping_patience,
                    best_epoch = best_epoch + 1,
                    "early stopping"
                );
                break;
            }
        }

        Ok(TrainingOutput {
            model: best_model,
            epochs_run: train_losses.len(),
            train_losses,
            best_train_loss,
            best_epoch,
            cancelled,
            training_time_secs: start_time.elapsed().as_secs_f64(),
        })
    }

    fn train_epoch<M, O, F>(
        &self,
        model: &mut M,
        optim: &mut O,
        loader: &SeqDataLoader,
        epoch: usize,
        forward_fn: &F,
    ) -> Result<f32>
    where
        M: AutodiffModule<B> + Clone,
        O: Optimizer<M, B>,
        F: Fn(&M, Tensor<B, 3>) -> Tensor<B, 2>,
    {
        let mut total_loss = 0.0f32;
        let mut n_batches = 0;

        for batch_result in loader.iter::<B>(&self.device, epoch) {
            let batch = batch_result?;

            let preds = forward_fn(model, batch.x);

            // MSE loss
            let diff = preds - batch.y;
            let loss = (diff.clone() * diff).mean();
            total_loss += loss.clone().into_scalar().elem::<f32>();

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, model);
            *model = optim.step(self.config.lr, model.clone(), grads);

            n_batches += 1;
        }

        Ok(total_loss / n_batches as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectSink;
    use ndarray::{Array2, Array3};
    use stockcast_core::Seed;
    use stockcast_data::WindowDataset;
    use stockcast_models::StackedLstmConfig;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn tiny_loader(n: usize, l: usize) -> SeqDataLoader {
        let mut x = Array3::zeros((n, 1, l));
        let mut y = Array2::zeros((n, 1));
        for i in 0..n {
            for t in 0..l {
                x[[i, 0, t]] = (i + t) as f32 / (n + l) as f32;
            }
            y[[i, 0]] = (i + l) as f32 / (n + l) as f32;
        }
        let dataset = WindowDataset::from_arrays(x, y).unwrap();
        SeqDataLoader::builder(dataset)
            .batch_size(8)
            .shuffle(true)
            .seed(Seed::new(7))
            .build()
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = RegressionTrainerConfig::default();
        assert_eq!(config.n_epochs, 50);
        assert_eq!(config.lr, 1e-3);
        assert_eq!(config.early_stopping_patience, 5);
    }

    #[test]
    fn test_fit_reports_monotonic_progress() {
        let device = Default::default();
        let model = StackedLstmConfig::new(4).init::<TestBackend>(&device);
        let loader = tiny_loader(16, 4);

        let config = RegressionTrainerConfig {
            n_epochs: 4,
            early_stopping_patience: 0,
            ..Default::default()
        };
        let trainer = RegressionTrainer::<TestBackend>::new(config, device);

        let mut sink = CollectSink::default();
        let output = trainer
            .fit_with_forward(model, &loader, &mut sink, &CancelToken::new(), |m, x| {
                m.forward(x)
            })
            .unwrap();

        assert!(!output.cancelled);
        assert_eq!(output.epochs_run, 4);
        assert_eq!(output.train_losses.len(), 4);
        // floor((e+1)*100/4) for e in 0..4
        assert_eq!(sink.values, vec![25, 50, 75, 100]);
        assert!(output.best_train_loss.is_finite());
    }

    // Cancels its own token as soon as the first epoch reports.
    struct CancellingSink {
        token: CancelToken,
        values: Vec<u8>,
    }

    impl ProgressSink for CancellingSink {
        fn report(&mut self, percent: u8) {
            self.values.push(percent);
            self.token.cancel();
        }
    }

    #[test]
    fn test_early_stopping_restores_best_epoch() {
        let device = Default::default();
        // No dropout and a zero learning rate make every epoch's loss
        // identical, so nothing improves after the first epoch.
        let config = StackedLstmConfig {
            dropout: 0.0,
            ..StackedLstmConfig::new(4)
        };
        let model = config.init::<TestBackend>(&device);
        let loader = tiny_loader(16, 4);

        let trainer = RegressionTrainer::<TestBackend>::new(
            RegressionTrainerConfig {
                n_epochs: 10,
                lr: 0.0,
                early_stopping_patience: 2,
                ..Default::default()
            },
            device,
        );

        let mut sink = CollectSink::default();
        let output = trainer
            .fit_with_forward(model, &loader, &mut sink, &CancelToken::new(), |m, x| {
                m.forward(x)
            })
            .unwrap();

        assert!(!output.cancelled);
        // Epoch 0 improves on infinity, then patience runs out.
        assert_eq!(output.epochs_run, 3);
        assert!(output.epochs_run < 10);
        assert_eq!(output.best_epoch, 0);
        assert_eq!(output.best_train_loss, output.train_losses[output.best_epoch]);
        assert!(output
            .train_losses
            .iter()
            .all(|&loss| loss >= output.best_train_loss));
    }

    #[test]
    fn test_mid_run_cancellation_stops_at_epoch_boundary() {
        let device = Default::default();
        let model = StackedLstmConfig::new(4).init::<TestBackend>(&device);
        let loader = tiny_loader(16, 4);

        let trainer = RegressionTrainer::<TestBackend>::new(
            RegressionTrainerConfig {
                n_epochs: 5,
                early_stopping_patience: 0,
                ..Default::default()
            },
            device,
        );

        let cancel = CancelToken::new();
        let mut sink = CancellingSink {
            token: cancel.clone(),
            values: Vec::new(),
        };
        let output = trainer
            .fit_with_forward(model, &loader, &mut sink, &cancel, |m, x| m.forward(x))
            .unwrap();

        // Epoch 0 completes and reports, then the loop stops at the next
        // boundary with the work so far intact.
        assert!(output.cancelled);
        assert_eq!(output.epochs_run, 1);
        assert_eq!(output.train_losses.len(), 1);
        assert_eq!(sink.values, vec![20]);
    }

    #[test]
    fn test_pre_cancelled_token_runs_no_epochs() {
        let device = Default::default();
        let model = StackedLstmConfig::new(4).init::<TestBackend>(&device);
        let loader = tiny_loader(16, 4);

        let trainer = RegressionTrainer::<TestBackend>::new(
            RegressionTrainerConfig {
                n_epochs: 3,
                ..Default::default()
            },
            device,
        );

        let cancel = CancelToken::new();
        cancel.cancel();

        let mut sink = CollectSink::default();
        let output = trainer
            .fit_with_forward(model, &loader, &mut sink, &cancel, |m, x| m.forward(x))
            .unwrap();

        assert!(output.cancelled);
        assert_eq!(output.epochs_run, 0);
        assert!(sink.values.is_empty());
    }
}
