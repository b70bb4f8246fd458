//! Exploring agent that drives the trainer
//!
//! Combines a [`QTrainer`] with a [`ReplayMemory`] and an exploration schedule
//! that fades out over the first `exploration_games` games.

use burn::tensor::backend::AutodiffBackend;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::config::AgentConfig;
use super::error::TrainError;
use super::memory::ReplayMemory;
use super::network::QNetworkConfig;
use super::trainer::{QTrainer, Transition};
use crate::game::RelativeAction;

/// Epsilon-greedy Q-learning agent
pub struct Agent<B: AutodiffBackend> {
    trainer: QTrainer<B>,
    memory: ReplayMemory,
    config: AgentConfig,
    rng: StdRng,
    games_played: u32,
    record: u32,
}

impl<B: AutodiffBackend> Agent<B> {
    /// Create an agent for observations of size `input_size`
    pub fn new(
        config: AgentConfig,
        input_size: usize,
        device: B::Device,
    ) -> Result<Self, TrainError> {
        config.validate()?;

        let network_config = QNetworkConfig::new(
            input_size,
            config.trainer.hidden_size,
            RelativeAction::COUNT,
        );
        let trainer = QTrainer::new(network_config, config.trainer.clone(), device)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            trainer,
            memory: ReplayMemory::new(config.max_memory),
            config,
            rng,
            games_played: 0,
            record: 0,
        })
    }

    pub fn trainer(&self) -> &QTrainer<B> {
        &self.trainer
    }

    pub fn trainer_mut(&mut self) -> &mut QTrainer<B> {
        &mut self.trainer
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn record(&self) -> u32 {
        self.record
    }

    /// Restore progress counters, e.g. after loading a saved model
    pub fn resume(&mut self, games_played: u32, record: u32) {
        self.games_played = games_played;
        self.record = record;
    }

    /// Remaining exploration budget; zero once enough games have been played
    pub fn epsilon(&self) -> u32 {
        self.config.exploration_games.saturating_sub(self.games_played)
    }

    /// Random action while exploring, otherwise the greedy action
    pub fn select_action(&mut self, state: &[f32]) -> Result<RelativeAction, TrainError> {
        let draw = self.rng.gen_range(0..=self.config.exploration_range);
        if draw < self.epsilon() {
            let idx = self.rng.gen_range(0..RelativeAction::COUNT);
            return Ok(RelativeAction::ALL[idx]);
        }

        self.trainer.best_action(state)
    }

    /// Store a transition for later replay
    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Train on the transition just observed
    pub fn train_short_memory(&mut self, transition: &Transition) -> Result<f32, TrainError> {
        self.trainer.train_step(transition)
    }

    /// Train on a random batch drawn from replay memory
    ///
    /// Returns `None` when the memory is still empty.
    pub fn train_long_memory(&mut self) -> Result<Option<f32>, TrainError> {
        if self.memory.is_empty() {
            return Ok(None);
        }

        let batch = self.memory.sample(&mut self.rng, self.config.batch_size);
        let loss = self.trainer.train_batch(&batch)?;
        debug!(batch = batch.len(), loss, "long-memory update");
        Ok(Some(loss))
    }

    /// Count a finished game; returns true when `score` sets a new record
    pub fn finish_game(&mut self, score: u32) -> bool {
        self.games_played += 1;
        if score > self.record {
            self.record = score;
            true
        } else {
            false
        }
    }
}
