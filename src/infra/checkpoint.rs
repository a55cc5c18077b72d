// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves model weights using Burn's CompactRecorder.
//
// What gets written:
//   1. Model weights (one file per saved epoch)
//   2. latest_epoch.json - which epoch was last saved
//   3. train_config.json - the run configuration, written
//                          once before training starts
//
// File naming convention:
//   checkpoints/
//     model_checkpoint_epoch_1.<ext>   ← weights after epoch 1
//     model_checkpoint_epoch_2.<ext>   ← weights after epoch 2
//     ...
//     latest_epoch.json
//     train_config.json
//
// <ext> is whatever the recorder appends. Writes are plain,
// non-atomic file writes and old checkpoints are never pruned.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Cnn;

/// Manages checkpoint files inside one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        // A failure here shows up on the first write, with context.
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Path of the checkpoint for `epoch`, without the recorder's extension.
    pub fn checkpoint_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_checkpoint_epoch_{epoch}"))
    }

    /// Save model weights for a given epoch and update latest_epoch.json.
    pub fn save_model<B: Backend>(&self, model: &Cnn<B>, epoch: usize) -> Result<PathBuf> {
        let path = self.checkpoint_path(epoch);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        let latest_path = self.dir.join("latest_epoch.json");
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| "Failed to write latest_epoch.json")?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(path)
    }

    /// Save the run configuration to JSON next to the checkpoints.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Epoch recorded by the most recent save_model call.
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join("latest_epoch.json");

        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

/// List the checkpoint files saved for `epoch` in `dir`.
/// Matches on the stem so the recorder's extension does not matter.
pub fn checkpoint_files(dir: &Path, epoch: usize) -> Result<Vec<PathBuf>> {
    let prefix = format!("model_checkpoint_epoch_{epoch}.");
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.starts_with(&prefix) {
            found.push(path);
        }
    }
    Ok(found)
}
