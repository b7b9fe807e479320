//! Background training worker.
//!
//! Runs the full pipeline (preprocess, split, train) on a dedicated thread
//! and reports progress and the terminal outcome over a channel. Exactly one
//! terminal event is sent per run: `Completed`, `Failed`, or `Cancelled`.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use burn::module::AutodiffModule;
use burn::prelude::*;
use chrono::NaiveDate;

use stockcast_core::Seed;
use stockcast_data::{ordered_split, PriceFrame, Preprocessor, SeqDataLoader, WindowDataset};
use stockcast_models::{StackedLstm, StackedLstmConfig};

use crate::error::Result;
use crate::progress::{CancelToken, ProgressSink};
use crate::trainer::{RegressionTrainer, RegressionTrainerConfig};

/// Backend used for training runs.
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
/// Backend used for inference on the trained model.
pub type InferenceBackend = burn::backend::NdArray;

/// Everything a training run needs as input.
#[derive(Debug, Clone)]
pub struct TrainSpec {
    /// The raw price data.
    pub frame: PriceFrame,
    /// Target column to model.
    pub target_col: String,
    /// Optional date column used to label forecasts.
    pub date_col: Option<String>,
    /// Input window length.
    pub seq_length: usize,
    /// Fraction of windows held out for evaluation.
    pub test_size: f32,
    /// Epoch limit.
    pub n_epochs: usize,
    /// Training batch size.
    pub batch_size: usize,
    /// Learning rate.
    pub lr: f64,
    /// Early stopping patience on training loss.
    pub early_stopping_patience: usize,
    /// Seed for weight init and batch shuffling.
    pub seed: Seed,
}

impl TrainSpec {
    /// Create a spec with default hyperparameters for the given data.
    #[must_use]
    pub fn new(frame: PriceFrame, target_col: &str) -> Self {
        Self {
            frame,
            target_col: target_col.to_string(),
            date_col: None,
            seq_length: 60,
            test_size: 0.2,
            n_epochs: 50,
            batch_size: 32,
            lr: 1e-3,
            early_stopping_patience: 5,
            seed: Seed::default(),
        }
    }
}

/// The artifacts of a completed training run.
///
/// Holds the inference model together with the fitted preprocessor and the
/// held-out windows, which is everything evaluation and forecasting need.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Trained model on the inference backend (best weights of the run).
    pub model: StackedLstm<InferenceBackend>,
    /// Preprocessor with the fitted scaler.
    pub preprocessor: Preprocessor,
    /// Held-out test windows, in temporal order.
    pub test: WindowDataset,
    /// The scaled trailing window of the full series, seed for forecasting.
    pub scaled_tail: Vec<f32>,
    /// Last date of the series, when a date column was given and parsed.
    pub last_date: Option<NaiveDate>,
    /// Training loss per completed epoch.
    pub train_losses: Vec<f32>,
    /// Epoch index of the restored best weights.
    pub best_epoch: usize,
    /// Number of epochs that actually ran.
    pub epochs_run: usize,
    /// Wall-clock training time in seconds.
    pub training_time_secs: f64,
}

/// Events emitted by a training run, in order.
#[derive(Debug)]
pub enum TrainEvent {
    /// Coarse progress after a completed epoch, in `0..=100`.
    Progress(u8),
    /// Terminal: the run finished and produced a result.
    Completed(Box<FitResult>),
    /// Terminal: the run failed.
    Failed(String),
    /// Terminal: the run was cancelled before completing.
    Cancelled,
}

struct ChannelSink {
    sender: Sender<TrainEvent>,
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, percent: u8) {
        // The receiver hanging up is not the trainer's problem.
        let _ = self.sender.send(TrainEvent::Progress(percent));
    }
}

/// Run the training pipeline synchronously.
///
/// Returns `Ok(None)` when the run was cancelled; errors cover everything
/// from bad columns to too-short series.
pub fn run_training(
    spec: &TrainSpec,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<Option<FitResult>> {
    TrainBackend::seed(spec.seed.value());
    let device = Default::default();

    let mut preprocessor = Preprocessor::new(&spec.target_col, spec.seq_length);
    let dataset = preprocessor.preprocess(&spec.frame)?;
    let (train, test) = ordered_split(&dataset, spec.test_size)?;

    tracing::info!(
        windows = dataset.len(),
        train = train.len(),
        test = test.len(),
        seq_length = spec.seq_length,
        "starting training run"
    );

    let loader = SeqDataLoader::builder(train)
        .batch_size(spec.batch_size)
        .shuffle(true)
        .seed(spec.seed)
        .build()?;

    let model = StackedLstmConfig::new(spec.seq_length).init::<TrainBackend>(&device);

    let trainer_config = RegressionTrainerConfig {
        n_epochs: spec.n_epochs,
        lr: spec.lr,
        early_stopping_patience: spec.early_stopping_patience,
        ..Default::default()
    };
    let trainer = RegressionTrainer::<TrainBackend>::new(trainer_config, device);

    let output = trainer.fit_with_forward(model, &loader, sink, cancel, |m, x| m.forward(x))?;
    if output.cancelled {
        return Ok(None);
    }

    let scaled_tail = preprocessor.scaled_tail(&spec.frame)?;
    let last_date = match &spec.date_col {
        Some(col) => match spec.frame.last_date(col) {
            Ok(date) => date,
            Err(err) => {
                tracing::warn!(column = %col, %err, "date column unusable, labels fall back to day offsets");
                None
            }
        },
        None => None,
    };

    Ok(Some(FitResult {
        model: output.model.valid(),
        preprocessor,
        test,
        scaled_tail,
        last_date,
        train_losses: output.train_losses,
        best_epoch: output.best_epoch,
        epochs_run: output.epochs_run,
        training_time_secs: output.training_time_secs,
    }))
}

/// Spawn a training run on a background thread.
///
/// The returned receiver yields zero or more `Progress` events followed by
/// exactly one terminal event. The cancel token stops the run at the next
/// epoch boundary; a run cancelled before its first epoch completes still
/// sends `Cancelled`.
pub fn spawn_training(
    spec: TrainSpec,
    cancel: CancelToken,
) -> (Receiver<TrainEvent>, JoinHandle<()>) {
    let (sender, receiver) = mpsc::channel();

    let handle = thread::spawn(move || {
        let mut sink = ChannelSink {
            sender: sender.clone(),
        };
        let terminal = match run_training(&spec, &mut sink, &cancel) {
            Ok(Some(result)) => TrainEvent::Completed(Box::new(result)),
            Ok(None) => TrainEvent::Cancelled,
            Err(err) => {
                tracing::error!(%err, "training run failed");
                TrainEvent::Failed(err.to_string())
            }
        };
        let _ = sender.send(terminal);
    });

    (receiver, handle)
}
