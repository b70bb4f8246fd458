//! Model persistence for saving and loading trained agents
//!
//! Network weights go through Burn's Record system; a JSON sidecar holds the
//! layer sizes and training progress needed to rebuild the network.

use super::{Agent, QNetwork, QNetworkConfig, TrainerConfig};
use anyhow::{Context, Result, ensure};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::{AutodiffBackend, Backend},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Where models are saved when no path is given
pub const DEFAULT_MODEL_PATH: &str = "snake_model/model.mpk";

/// Metadata saved with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Layer sizes of the saved network
    pub network: QNetworkConfig,

    /// Trainer configuration used during training
    pub trainer: TrainerConfig,

    /// Number of games played when the model was saved
    pub games_played: u32,

    /// Best score reached so far
    pub record: u32,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        network: QNetworkConfig,
        trainer: TrainerConfig,
        games_played: u32,
        record: u32,
    ) -> Self {
        Self {
            network,
            trainer,
            games_played,
            record,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn metadata_path(path: &Path) -> std::path::PathBuf {
    path.with_extension("meta.json")
}

/// Save an agent's network and progress to `path`
///
/// Two files are written:
/// - `<path>` - Network weights (Burn named MessagePack record)
/// - `<path>.meta.json` - Metadata as JSON
pub fn save_model<B: AutodiffBackend>(agent: &Agent<B>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    let trainer = agent.trainer();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(trainer.parameters(), path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(
        trainer.network_config(),
        trainer.config().clone(),
        agent.games_played(),
        agent.record(),
    );

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    info!(path = ?path, games = metadata.games_played, record = metadata.record, "model saved");

    Ok(())
}

/// Read only the metadata sidecar of a saved model
pub fn load_metadata(path: &Path) -> Result<ModelMetadata> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    serde_json::from_str(&meta_json).context("Failed to deserialize metadata")
}

/// Load a saved network onto any backend, e.g. for greedy play
pub fn load_network<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(QNetwork<B>, ModelMetadata)> {
    let metadata = load_metadata(path)?;

    let network = metadata.network.init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}

/// Restore weights and progress counters into an existing agent
pub fn load_into_agent<B: AutodiffBackend>(
    agent: &mut Agent<B>,
    path: &Path,
    device: &B::Device,
) -> Result<ModelMetadata> {
    let metadata = load_metadata(path)?;
    ensure!(
        metadata.network == agent.trainer().network_config(),
        "saved network {:?} does not match agent network {:?}",
        metadata.network,
        agent.trainer().network_config()
    );

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    agent.trainer_mut().load_parameters(record);
    agent.resume(metadata.games_played, metadata.record);

    info!(path = ?path, games = metadata.games_played, record = metadata.record, "model loaded");

    Ok(metadata)
}
