use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use q_snake::game::GameConfig;
use q_snake::modes::{TrainConfig, TrainMode, WatchConfig, WatchMode};
use q_snake::rl::{DEFAULT_MODEL_PATH, InferenceBackend, TrainingBackend, default_device};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake game played by a Q-learning agent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train an agent headlessly
    Train(TrainArgs),
    /// Watch a trained agent play in the terminal
    Watch(WatchArgs),
}

#[derive(Args)]
struct BoardArgs {
    /// Board width in pixels
    #[arg(long, default_value = "640")]
    width: i32,

    /// Board height in pixels
    #[arg(long, default_value = "480")]
    height: i32,

    /// Size of one snake segment in pixels
    #[arg(long, default_value = "20")]
    block_size: i32,

    /// Seed for food placement (and exploration when training)
    #[arg(long)]
    seed: Option<u64>,
}

impl BoardArgs {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            block_size: self.block_size,
            seed: self.seed,
            ..GameConfig::default()
        }
    }
}

#[derive(Args)]
struct TrainArgs {
    /// Number of games to play
    #[arg(long, default_value = "1000")]
    episodes: usize,

    /// Where to save the model
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Continue training from an existing model
    #[arg(long)]
    resume: bool,

    /// Log progress every N games
    #[arg(long, default_value = "10")]
    log_every: usize,

    #[command(flatten)]
    board: BoardArgs,
}

#[derive(Args)]
struct WatchArgs {
    /// Model to load
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Game steps per second
    #[arg(long, default_value = "10")]
    speed: u32,

    #[command(flatten)]
    board: BoardArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Train(args) => {
            let mut config = TrainConfig::new(args.episodes, args.model);
            config.resume = args.resume;
            config.log_frequency = args.log_every;
            config.game_config = args.board.game_config();
            config.agent_config.seed = args.board.seed;

            let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
            // Training is CPU-bound; keep it off the async workers
            tokio::task::block_in_place(|| train_mode.run())?;
        }
        Command::Watch(args) => {
            let mut config = WatchConfig::new(args.model);
            config.steps_per_second = args.speed;
            config.game_config = args.board.game_config();

            let mut watch_mode = WatchMode::<InferenceBackend>::new(config, default_device())?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
