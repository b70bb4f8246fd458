use super::observation::create_observation;
use crate::game::{GameConfig, GameEngine, GameError, GameState, RelativeAction, StepResult};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and provides:
/// - 11-feature observations (see [`create_observation`])
/// - Discrete relative action space (straight, turn right, turn left)
/// - Standard RL interface (reset, step)
///
/// Stepping a terminated episode is an error; call [`reset`](Self::reset) first.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment with a running episode
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset()?;
        Ok(Self { engine, state })
    }

    /// Start a new episode and return its initial observation
    pub fn reset(&mut self) -> Result<Vec<f32>, GameError> {
        self.state = self.engine.reset()?;
        Ok(create_observation(&self.state))
    }

    /// Step the environment with a relative action
    ///
    /// Returns the next observation and the step result (reward, done, score).
    pub fn step(&mut self, action: RelativeAction) -> Result<(Vec<f32>, StepResult), GameError> {
        let result = self.engine.step(&mut self.state, action)?;
        Ok((create_observation(&self.state), result))
    }

    /// Step with a one-hot `[straight, right, left]` action vector
    pub fn step_one_hot(&mut self, one_hot: &[f32]) -> Result<(Vec<f32>, StepResult), GameError> {
        let action = RelativeAction::from_one_hot(one_hot)?;
        self.step(action)
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> Vec<f32> {
        create_observation(&self.state)
    }

    /// Collision test for the current head
    pub fn is_collision(&self) -> bool {
        self.state.is_collision()
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }
}
