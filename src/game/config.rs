use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Configuration for the game
///
/// Grid extents are expressed in pixels and must be multiples of `block_size`;
/// every position on the grid is a multiple of `block_size` as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the playing field
    pub width: i32,
    /// Height of the playing field
    pub height: i32,
    /// Side length of a single cell
    pub block_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Episode times out once the frame counter exceeds `timeout_factor * snake length`
    pub timeout_factor: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Base penalty for hitting a wall or the body; the score is subtracted on top
    pub collision_penalty: f32,
    /// Base penalty for starving; the score is subtracted on top
    pub timeout_penalty: f32,

    /// Random draws attempted before falling back to scanning free cells
    pub max_food_attempts: usize,
    /// Seed for food placement; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            initial_snake_length: 3,
            timeout_factor: 100,
            food_reward: 10.0,
            collision_penalty: -10.0,
            timeout_penalty: -1.0,
            max_food_attempts: 1000,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing (10x10 cells)
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    /// Same configuration with a fixed food seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), GameError> {
        if self.block_size <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }

        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }

        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid {}x{} is not a multiple of block size {}",
                self.width, self.height, self.block_size
            )));
        }

        if self.initial_snake_length < 1 {
            return Err(GameError::InvalidConfig(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        // The snake starts at the centre column and extends leftward.
        let head_column = (self.columns() / 2) as usize;
        if self.initial_snake_length > head_column + 1 {
            return Err(GameError::InvalidConfig(format!(
                "snake of length {} does not fit left of column {}",
                self.initial_snake_length, head_column
            )));
        }

        if self.timeout_factor == 0 {
            return Err(GameError::InvalidConfig(
                "timeout_factor must be at least 1".to_string(),
            ));
        }

        if self.max_food_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max_food_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
