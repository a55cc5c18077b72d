// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Runs the training pipeline in order:
//
//   Step 1: Load the training image     (Layer 4 - data)
//   Step 2: Build the validation set    (Layer 4 - data)
//   Step 3: Open checkpoint + log dirs  (Layer 6 - infra)
//   Step 4: Save config                 (Layer 6 - infra)
//   Step 5: Train, then validate        (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::ValidationDataset, loader::ImageFileLoader};
use crate::domain::traits::ImageSource;
use crate::infra::{checkpoint::CheckpointManager, scalars::ScalarWriter};
use crate::ml::{
    model::CnnConfig,
    trainer::{run_training, TrainReport},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Serialisable so the run's
// settings can be written next to its checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub image_path:     String,
    pub val_data:       String,
    pub val_labels:     String,
    pub checkpoint_dir: String,
    pub log_dir:        String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub val_batch_size: usize,
    pub lr:             f64,
    pub save_every:     usize,
    pub target_class:   usize,
    pub seed:           u64,
    pub lr_boundaries:  Vec<usize>,
    /// Values of the piecewise schedule; `None` means a constant `lr`
    pub lr_values:      Option<Vec<f64>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            image_path:     "/content/7/7.jpeg".to_string(),
            val_data:       "/content/7/7.jpeg".to_string(),
            val_labels:     "/content/7/7test.txt".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            log_dir:        "log".to_string(),
            epochs:         10,
            batch_size:     32,
            val_batch_size: 32,
            lr:             1e-3,
            save_every:     1,
            target_class:   7,
            seed:           42,
            lr_boundaries:  Vec::new(),
            lr_values:      None,
        }
    }
}

impl TrainConfig {
    /// Schedule values, falling back to a single constant piece at `lr`.
    pub fn lr_values(&self) -> Vec<f64> {
        self.lr_values.clone().unwrap_or_else(|| vec![self.lr])
    }

    /// Reject settings the loop cannot run with.
    pub fn check(&self) -> Result<()> {
        if self.batch_size == 0 || self.val_batch_size == 0 {
            anyhow::bail!("Batch sizes must be greater than 0");
        }
        if self.save_every == 0 {
            anyhow::bail!("save_every must be greater than 0");
        }
        let num_classes = CnnConfig::new().num_classes;
        if self.target_class >= num_classes {
            anyhow::bail!(
                "target_class {} is out of range for a {}-class model",
                self.target_class,
                num_classes
            );
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.check()?;

        // ── Step 1: Load the image ────────────────────────────────────────────
        let side   = CnnConfig::new().input_size;
        let loader = ImageFileLoader::new(&cfg.image_path);
        let image  = loader
            .load(side, side)
            .with_context(|| "Cannot load the training image")?;
        tracing::info!(
            "Loaded training image '{}' as {:?}",
            loader.path().display(),
            image.shape()
        );

        // ── Step 2: Validation set ────────────────────────────────────────────
        let val_dataset = ValidationDataset::new(&cfg.val_data, &cfg.val_labels);

        // ── Step 3: Output locations ──────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let scalars      = ScalarWriter::new(&cfg.log_dir)?;

        // ── Step 4: Save config ───────────────────────────────────────────────
        ckpt_manager.save_config(cfg)?;

        // ── Step 5: Train + validate (Layer 5) ────────────────────────────────
        run_training(cfg, image, val_dataset, &ckpt_manager, &scalars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_constants() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.epochs, 10);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.val_batch_size, 32);
        assert_eq!(cfg.lr, 0.001);
        assert_eq!(cfg.save_every, 1);
        assert_eq!(cfg.lr_values(), vec![0.001]);
    }

    #[test]
    fn test_check_rejects_zero_save_every() {
        let cfg = TrainConfig { save_every: 0, ..TrainConfig::default() };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_check_rejects_zero_batch() {
        let cfg = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_check_rejects_out_of_range_target_class() {
        let cfg = TrainConfig { target_class: 12, ..TrainConfig::default() };
        let err = cfg.check().unwrap_err();
        assert!(err.to_string().contains("target_class 12"));

        let cfg = TrainConfig { target_class: 9, ..TrainConfig::default() };
        assert!(cfg.check().is_ok());
    }

    #[test]
    fn test_missing_image_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            image_path:     dir.path().join("missing.jpeg").display().to_string(),
            checkpoint_dir: dir.path().join("ckpt").display().to_string(),
            log_dir:        dir.path().join("log").display().to_string(),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("missing.jpeg"));
        assert!(!dir.path().join("ckpt").exists());
    }
}
