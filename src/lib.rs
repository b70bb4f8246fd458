//! Q-Snake - a Snake environment with a Q-learning agent
//!
//! This library provides:
//! - Core game logic (game module)
//! - Q-network, trainer and agent (rl module)
//! - Training statistics (metrics module)
//! - TUI rendering (render module)
//! - Execution modes (train, watch)

pub mod game;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
