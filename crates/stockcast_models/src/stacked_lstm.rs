//! Stacked LSTM regression model for next-step price prediction.

use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the stacked LSTM model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackedLstmConfig {
    /// Input window length.
    pub seq_length: usize,
    /// Hidden dimension of both LSTM layers.
    pub hidden_size: usize,
    /// Width of the intermediate fully-connected layer.
    pub fc_hidden: usize,
    /// Dropout rate applied after each LSTM layer (training only).
    pub dropout: f64,
}

impl Default for StackedLstmConfig {
    fn default() -> Self {
        Self {
            seq_length: 60,
            hidden_size: 50,
            fc_hidden: 25,
            dropout: 0.2,
        }
    }
}

impl StackedLstmConfig {
    /// Create a config for the given window length.
    #[must_use]
    pub fn new(seq_length: usize) -> Self {
        Self {
            seq_length,
            ..Default::default()
        }
    }

    /// Initialize the model on the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> StackedLstm<B> {
        StackedLstm::new(self.clone(), device)
    }
}

/// Two stacked LSTM layers with dropout and a two-layer regression head.
///
/// Input is a batch of univariate windows in `(batch, vars, seq_len)`
/// format; output is one predicted next-step value per window. Dropout is
/// only active on autodiff backends, so inference through a
/// [`valid`](burn::module::AutodiffModule::valid) model is deterministic.
#[derive(Module, Debug)]
pub struct StackedLstm<B: Backend> {
    /// First LSTM layer, consuming the raw univariate sequence.
    lstm1: Lstm<B>,
    /// Second LSTM layer, consuming the first layer's full output sequence.
    lstm2: Lstm<B>,
    /// Dropout applied after each LSTM layer.
    dropout: Dropout,
    /// Intermediate fully-connected layer.
    fc1: Linear<B>,
    /// Output head producing one value per window.
    fc2: Linear<B>,
}

impl<B: Backend> StackedLstm<B> {
    /// Create a new stacked LSTM model.
    pub fn new(config: StackedLstmConfig, device: &B::Device) -> Self {
        let lstm1 = LstmConfig::new(1, config.hidden_size, true).init(device);
        let lstm2 = LstmConfig::new(config.hidden_size, config.hidden_size, true).init(device);
        let dropout = DropoutConfig::new(config.dropout).init();
        let fc1 = LinearConfig::new(config.hidden_size, config.fc_hidden).init(device);
        let fc2 = LinearConfig::new(config.fc_hidden, 1).init(device);

        Self {
            lstm1,
            lstm2,
            dropout,
            fc1,
            fc2,
        }
    }

    /// Forward pass.
    ///
    /// Takes windows of shape `(batch, 1, seq_len)` and returns predictions
    /// of shape `(batch, 1)` in the normalized scale.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch, _n_vars, seq_len] = x.dims();

        // Transpose to (batch, seq_len, n_vars) for the LSTM layers
        let x = x.swap_dims(1, 2);

        let (output, _) = self.lstm1.forward(x, None);
        let output = self.dropout.forward(output);

        let (output, _) = self.lstm2.forward(output, None);
        let [_, _, hidden_dim] = output.dims();

        // Take the last timestep of the second LSTM
        let last = output.slice([0..batch, (seq_len - 1)..seq_len, 0..hidden_dim]);
        let last = last.reshape([batch, hidden_dim]);
        let last = self.dropout.forward(last);

        let hidden = self.fc1.forward(last);
        self.fc2.forward(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_config_defaults() {
        let config = StackedLstmConfig::new(10);
        assert_eq!(config.seq_length, 10);
        assert_eq!(config.hidden_size, 50);
        assert_eq!(config.fc_hidden, 25);
        assert!((config.dropout - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: StackedLstm<TestBackend> = StackedLstmConfig::new(10).init(&device);

        let x = Tensor::<TestBackend, 3>::zeros([4, 1, 10], &device);
        let out = model.forward(x);
        assert_eq!(out.dims(), [4, 1]);
    }

    #[test]
    fn test_forward_single_window() {
        let device = Default::default();
        let model: StackedLstm<TestBackend> = StackedLstmConfig::new(5).init(&device);

        let x = Tensor::<TestBackend, 3>::ones([1, 1, 5], &device);
        let out = model.forward(x);
        assert_eq!(out.dims(), [1, 1]);

        let value: f32 = out.into_scalar().elem();
        assert!(value.is_finite());
    }
}
