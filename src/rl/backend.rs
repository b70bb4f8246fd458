//! Backend type aliases and device management
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend used by [`QTrainer`](super::QTrainer)
//! - **InferenceBackend**: Plain NdArray backend for greedy play
//!
//! The Q-network is tiny, so the CPU NdArray backend is all this crate needs.
//!
//! # Example
//!
//! ```rust
//! use q_snake::rl::{QTrainer, QNetworkConfig, TrainerConfig, TrainingBackend, default_device};
//!
//! let trainer = QTrainer::<TrainingBackend>::new(
//!     QNetworkConfig::new(11, 256, 3),
//!     TrainerConfig::default(),
//!     default_device(),
//! )
//! .unwrap();
//! assert_eq!(trainer.training_steps(), 0);
//! ```

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

/// Backend type for training (with autodiff)
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation (CPU)
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
