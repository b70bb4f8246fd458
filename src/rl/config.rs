//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

use super::error::TrainError;

/// Configuration for the Q-learning trainer
///
/// # Example
///
/// ```rust
/// use q_snake::rl::TrainerConfig;
///
/// let config = TrainerConfig {
///     learning_rate: 5e-4,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 1e-3
    pub learning_rate: f64,

    /// Discount factor applied to the bootstrapped next-state value
    ///
    /// Must lie in [0, 1).
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the network's hidden layer
    ///
    /// Default: 256
    pub hidden_size: usize,
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(TrainError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }

        if !(0.0..1.0).contains(&self.gamma) {
            return Err(TrainError::InvalidConfig(format!(
                "gamma must be in [0, 1), got {}",
                self.gamma
            )));
        }

        if self.hidden_size == 0 {
            return Err(TrainError::InvalidConfig(
                "hidden_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.9,
            hidden_size: 256,
        }
    }
}

/// Configuration for the exploring agent and its replay memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Replay memory capacity; oldest transitions are evicted first
    ///
    /// Default: 100_000
    pub max_memory: usize,

    /// Transitions sampled per long-memory update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Games over which random exploration decays to zero
    ///
    /// Default: 80
    pub exploration_games: u32,

    /// Upper bound of the exploration draw; a random action is taken when
    /// `rand(0..=exploration_range) < exploration_games - games_played`
    ///
    /// Default: 200
    pub exploration_range: u32,

    /// Seed for exploration and replay sampling; `None` draws from entropy
    pub seed: Option<u64>,

    /// Trainer hyperparameters
    pub trainer: TrainerConfig,
}

impl AgentConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.max_memory == 0 {
            return Err(TrainError::InvalidConfig(
                "max_memory must be at least 1".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(TrainError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }

        if self.exploration_range == 0 {
            return Err(TrainError::InvalidConfig(
                "exploration_range must be at least 1".to_string(),
            ));
        }

        self.trainer.validate()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_memory: 100_000,
            batch_size: 1000,
            exploration_games: 80,
            exploration_range: 200,
            seed: None,
            trainer: TrainerConfig::default(),
        }
    }
}
