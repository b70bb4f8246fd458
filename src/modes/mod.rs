pub mod train;
pub mod watch;

pub use train::{EpisodeSummary, TrainConfig, TrainMode};
pub use watch::{WatchConfig, WatchMode};
