//! Reinforcement learning for the Snake game
//!
//! Provides:
//! - 11-feature observations of the game state
//! - An RL environment wrapping the game engine
//! - A one-hidden-layer Q-network and its one-step TD trainer
//! - Replay memory and an epsilon-greedy agent
//! - Model persistence

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod error;
pub mod memory;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod trainer;

pub use agent::Agent;
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use config::{AgentConfig, TrainerConfig};
pub use environment::SnakeEnvironment;
pub use error::TrainError;
pub use memory::ReplayMemory;
pub use network::{QNetwork, QNetworkConfig, QNetworkRecord};
pub use observation::{OBSERVATION_SIZE, create_observation};
pub use persistence::{
    DEFAULT_MODEL_PATH, ModelMetadata, load_into_agent, load_metadata, load_network, save_model,
};
pub use trainer::{QTrainer, Transition, argmax};
