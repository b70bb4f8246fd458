//! Watch a trained agent play
//!
//! Loads a saved model and plays greedily in the terminal, starting a new
//! game whenever one ends.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - Q/Esc: Quit
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::modes::{WatchConfig, WatchMode};
//! use q_snake::rl::{InferenceBackend, default_device};
//! use std::path::PathBuf;
//!
//! # async fn watch() -> anyhow::Result<()> {
//! let config = WatchConfig::new(PathBuf::from("snake_model/model.mpk"));
//! let mut watch_mode = WatchMode::<InferenceBackend>::new(config, default_device())?;
//! watch_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result, ensure};
use burn::tensor::{Tensor, TensorData, backend::Backend};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures::StreamExt;
use std::{path::PathBuf, time::Duration};
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, RelativeAction};
use crate::render::{HudStatus, Renderer, TerminalContext};
use crate::rl::{OBSERVATION_SIZE, QNetwork, SnakeEnvironment, argmax, load_network};

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub model_path: PathBuf,

    /// Board to play on; need not match the training board
    pub game_config: GameConfig,

    /// Game steps per second
    pub steps_per_second: u32,
}

impl WatchConfig {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            game_config: GameConfig::default(),
            steps_per_second: 10,
        }
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.steps_per_second.clamp(1, 1000)))
    }
}

/// Greedy playback of a saved model
pub struct WatchMode<B: Backend> {
    network: QNetwork<B>,
    env: SnakeEnvironment,
    renderer: Renderer,
    hud: HudStatus,
    config: WatchConfig,
    device: B::Device,
    should_quit: bool,
}

impl<B: Backend> WatchMode<B> {
    pub fn new(config: WatchConfig, device: B::Device) -> Result<Self> {
        let (network, metadata) = load_network::<B>(&config.model_path, &device)
            .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

        ensure!(
            metadata.network.input_size == OBSERVATION_SIZE
                && metadata.network.output_size == RelativeAction::COUNT,
            "model has {} inputs and {} outputs, expected {} and {}",
            metadata.network.input_size,
            metadata.network.output_size,
            OBSERVATION_SIZE,
            RelativeAction::COUNT
        );

        info!(
            path = ?config.model_path,
            games_trained = metadata.games_played,
            record = metadata.record,
            version = %metadata.version,
            "loaded model"
        );

        let env = SnakeEnvironment::new(config.game_config.clone())
            .context("Invalid game configuration")?;

        Ok(Self {
            network,
            env,
            renderer: Renderer::new(),
            hud: HudStatus::default(),
            config,
            device,
            should_quit: false,
        })
    }

    /// Run until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalContext::new();
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.config.tick_interval());
        let mut render_timer = interval(Duration::from_millis(33));

        while !self.should_quit {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key.code);
                        }
                    }
                }

                _ = tick_timer.tick() => {
                    self.tick()?;
                }

                _ = render_timer.tick() => {
                    let (renderer, state, hud) = (&self.renderer, self.env.state(), self.hud);
                    terminal.draw(|frame| renderer.render(frame, state, hud))?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }
        }

        terminal.restore()
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.hud.paused = !self.hud.paused,
            _ => {}
        }
    }

    /// Advance one step, or start a new game if the last one ended
    fn tick(&mut self) -> Result<()> {
        if self.hud.paused {
            return Ok(());
        }

        if !self.env.state().is_running() {
            self.hud.games += 1;
            self.env.reset()?;
            return Ok(());
        }

        let action = self.greedy_action(&self.env.observation())?;
        let (_, result) = self.env.step(action)?;
        self.hud.best = self.hud.best.max(result.score);
        Ok(())
    }

    fn greedy_action(&self, observation: &[f32]) -> Result<RelativeAction> {
        let input = Tensor::<B, 2>::from_data(
            TensorData::new(observation.to_vec(), [1, observation.len()]),
            &self.device,
        );
        let q_values: Vec<f32> = self
            .network
            .forward(input)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|err| anyhow::anyhow!("Failed to read Q-values: {:?}", err))?;

        Ok(RelativeAction::from_index(argmax(&q_values))?)
    }
}
