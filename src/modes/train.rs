//! Training mode for the Q-learning agent
//!
//! Plays games headlessly, training on every step (short memory) and on a
//! replay batch after every game (long memory). The model is saved whenever
//! a game sets a new record, and once more when training finishes.
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::modes::{TrainConfig, TrainMode};
//! use q_snake::rl::{TrainingBackend, default_device};
//! use std::path::PathBuf;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TrainConfig::new(500, PathBuf::from("snake_model/model.mpk"));
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
//! train_mode.run()?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{
    Agent, AgentConfig, OBSERVATION_SIZE, SnakeEnvironment, Transition, load_into_agent,
    save_model,
};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of games to play
    pub num_episodes: usize,

    /// Where the model is saved
    pub save_path: PathBuf,

    /// Log a progress line every N games (record games are always logged)
    pub log_frequency: usize,

    /// Continue from the model at `save_path` if one exists
    pub resume: bool,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// Agent and trainer hyperparameters
    pub agent_config: AgentConfig,
}

impl TrainConfig {
    /// Defaults for everything but the game count and save path
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            log_frequency: 10,
            resume: false,
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
        }
    }
}

/// Totals for one finished game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub score: u32,
    pub reward: f32,
    pub steps: usize,
}

/// Training mode for the Q-learning agent
pub struct TrainMode<B: AutodiffBackend> {
    agent: Agent<B>,
    env: SnakeEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
}

impl<B: AutodiffBackend> TrainMode<B> {
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        let env = SnakeEnvironment::new(config.game_config.clone())
            .context("Invalid game configuration")?;

        let mut agent = Agent::new(config.agent_config.clone(), OBSERVATION_SIZE, device.clone())
            .context("Invalid agent configuration")?;

        if config.resume {
            if config.save_path.exists() {
                load_into_agent(&mut agent, &config.save_path, &device).with_context(|| {
                    format!("Failed to resume from {:?}", config.save_path)
                })?;
            } else {
                warn!(path = ?config.save_path, "no saved model to resume from, starting fresh");
            }
        }

        Ok(Self {
            agent,
            env,
            stats: TrainingStats::new(100),
            config,
        })
    }

    pub fn agent(&self) -> &Agent<B> {
        &self.agent
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Run the training loop for the configured number of games
    pub fn run(&mut self) -> Result<()> {
        self.log_header();

        for _ in 0..self.config.num_episodes {
            let summary = self.run_episode()?;

            let new_record = self.agent.finish_game(summary.score);
            if let Some(loss) = self
                .agent
                .train_long_memory()
                .context("Long-memory training failed")?
            {
                self.stats.record_loss(loss);
            }

            self.stats
                .record_episode(summary.score, summary.reward, summary.steps);

            if new_record {
                self.save_model()?;
            }

            let game = self.agent.games_played();
            if new_record || game as usize % self.config.log_frequency.max(1) == 0 {
                info!(
                    game,
                    score = summary.score,
                    record = self.agent.record(),
                    mean_score = self.stats.mean_score(),
                    "game finished"
                );
            }
        }

        self.save_model()?;

        info!(path = ?self.config.save_path, "training complete");
        info!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Play one game from a fresh reset until it terminates
    fn run_episode(&mut self) -> Result<EpisodeSummary> {
        let mut state = self.env.reset().context("Failed to reset environment")?;
        let mut reward = 0.0;
        let mut steps = 0;

        loop {
            let action = self.agent.select_action(&state)?;
            let (next_state, result) = self.env.step(action)?;

            let transition = Transition::new(
                state,
                action,
                result.reward,
                next_state.clone(),
                result.done,
            );
            self.agent.train_short_memory(&transition)?;
            self.agent.remember(transition);

            reward += result.reward;
            steps += 1;
            state = next_state;

            if result.done {
                return Ok(EpisodeSummary {
                    score: result.score,
                    reward,
                    steps,
                });
            }
        }
    }

    fn save_model(&self) -> Result<()> {
        save_model(&self.agent, &self.config.save_path)
            .with_context(|| format!("Failed to save model to {:?}", self.config.save_path))
    }

    fn log_header(&self) {
        let game = &self.config.game_config;
        let agent = &self.config.agent_config;
        info!(
            games = self.config.num_episodes,
            width = game.width,
            height = game.height,
            block_size = game.block_size,
            "starting training"
        );
        info!(
            learning_rate = agent.trainer.learning_rate,
            gamma = agent.trainer.gamma,
            hidden_size = agent.trainer.hidden_size,
            batch_size = agent.batch_size,
            max_memory = agent.max_memory,
            "agent configuration"
        );
        info!(path = ?self.config.save_path, "models will be saved to");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{TrainingBackend, default_device, load_metadata};
    use tempfile::TempDir;

    fn test_config(num_episodes: usize, save_path: PathBuf) -> TrainConfig {
        let mut config = TrainConfig::new(num_episodes, save_path);
        config.game_config = GameConfig::small().with_seed(5);
        config.agent_config.seed = Some(5);
        config.agent_config.batch_size = 32;
        config.agent_config.trainer.hidden_size = 16;
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(1000, PathBuf::from("test.mpk"));
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.save_path, PathBuf::from("test.mpk"));
        assert!(!config.resume);
    }

    #[test]
    fn test_invalid_game_config_rejected() {
        let mut config = TrainConfig::new(1, PathBuf::from("unused.mpk"));
        config.game_config.width = 645;
        assert!(TrainMode::<TrainingBackend>::new(config, default_device()).is_err());
    }

    #[test]
    fn test_run_single_episode() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(1, temp_dir.path().join("model.mpk"));
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        let summary = train_mode.run_episode().unwrap();

        assert!(summary.steps > 0);
        assert_eq!(train_mode.agent().memory().len(), summary.steps);
        assert_eq!(train_mode.agent().trainer().training_steps(), summary.steps);
    }

    #[test]
    fn test_run_trains_and_saves() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("model.mpk");
        let config = test_config(3, save_path.clone());
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        train_mode.run().unwrap();

        assert_eq!(train_mode.stats().total_episodes(), 3);
        assert_eq!(train_mode.agent().games_played(), 3);
        assert_eq!(train_mode.stats().record(), train_mode.agent().record());

        let metadata = load_metadata(&save_path).unwrap();
        assert_eq!(metadata.games_played, 3);
    }

    #[test]
    fn test_resume_continues_counters() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("model.mpk");

        let mut first =
            TrainMode::<TrainingBackend>::new(test_config(2, save_path.clone()), default_device())
                .unwrap();
        first.run().unwrap();

        let mut config = test_config(1, save_path);
        config.resume = true;
        let second = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        assert_eq!(second.agent().games_played(), 2);
    }
}
