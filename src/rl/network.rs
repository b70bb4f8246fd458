//! Feed-forward Q-value network
//!
//! A single hidden layer with ReLU maps an observation vector to one raw score
//! per relative action:
//!
//! ```text
//! Input: [batch, input_size]
//!   ↓ Linear(input_size → hidden_size) + ReLU
//!   ↓ Linear(hidden_size → output_size)
//! Output: [batch, output_size]   (no activation, used as Q-values)
//! ```
//!
//! # Example
//!
//! ```rust
//! use q_snake::rl::QNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::new(11, 256, 3).init::<Backend>(&device);
//!
//! let observation = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(observation);
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};
use serde::{Deserialize, Serialize};

/// Layer sizes of the Q-network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Observation dimension
    pub input_size: usize,

    /// Width of the hidden layer
    pub hidden_size: usize,

    /// Number of action scores (3 for straight/right/left)
    pub output_size: usize,
}

impl QNetworkConfig {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            output_size,
        }
    }

    /// Initialize the network on `device` with Burn's default parameter init
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            linear1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            linear2: LinearConfig::new(self.hidden_size, self.output_size).init(device),
        }
    }
}

/// Two-layer perceptron producing per-action value estimates
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    /// Observation to hidden layer
    linear1: Linear<B>,
    /// Hidden layer to action scores
    linear2: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: `[batch, input_size]` to `[batch, output_size]`
    pub fn forward(&self, observation: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear1.forward(observation);
        let x = relu(x);
        self.linear2.forward(x)
    }

    /// Observation dimension this network accepts
    pub fn input_size(&self) -> usize {
        self.linear1.weight.val().dims()[0]
    }

    /// Number of action scores this network produces
    pub fn output_size(&self) -> usize {
        self.linear2.weight.val().dims()[1]
    }
}
