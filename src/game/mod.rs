//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It can be used programmatically for RL training and for replaying trained agents.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, RelativeAction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepOutcome, StepResult};
pub use error::GameError;
pub use state::{EpisodeStatus, GameState, Position, Snake, TerminationReason};
