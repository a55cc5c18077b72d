// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Epoch loop over the one-image training set, then a single
// validation pass, using Burn's DataLoader and Adam.
//
//   - Training runs on an AutodiffBackend (Autodiff<Wgpu> in
//     the binary, Autodiff<NdArray> in tests)
//   - model.valid() drops to the inner backend for validation,
//     so the validation batcher is built on B::InnerBackend
//   - The schedule is stepped once per batch and its value is
//     the lr handed to the optimiser
//   - Every scalar is logged at the run's global step, which is
//     never advanced, so all points share step 0

use anyhow::{Context, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    lr_scheduler::LrScheduler,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{TrainingBatcher, ValidationBatcher},
    dataset::{ImageDataset, ValidationDataset},
};
use crate::domain::image::Image;
use crate::infra::{checkpoint::CheckpointManager, scalars::ScalarWriter};
use crate::ml::{
    metric::Accuracy,
    model::{Cnn, CnnConfig},
    schedule::PiecewiseDecayConfig,
};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

pub const TRAIN_LOSS_TAG:    &str = "train/loss";
pub const EVAL_ACCURACY_TAG: &str = "eval/accuracy";

/// Per-epoch numbers printed and returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub epoch:      usize,
    pub train_loss: f64,
    pub lr:         f64,
    pub checkpoint: bool,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs:   Vec<EpochSummary>,
    pub accuracy: f64,
}

pub fn run_training(
    cfg:          &TrainConfig,
    image:        Image,
    val_dataset:  ValidationDataset,
    ckpt_manager: &CheckpointManager,
    scalars:      &ScalarWriter,
) -> Result<TrainReport> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, image, val_dataset, ckpt_manager, scalars, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    image:        Image,
    val_dataset:  ValidationDataset,
    ckpt_manager: &CheckpointManager,
    scalars:      &ScalarWriter,
    device:       B::Device,
) -> Result<TrainReport> {
    cfg.check()?;

    let model_cfg = CnnConfig::new();
    let mut model: Cnn<B> = model_cfg.init(&device);
    tracing::info!("Model ready: {} parameters", model.num_params());

    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    let mut schedule = PiecewiseDecayConfig::new(cfg.lr_boundaries.clone(), cfg.lr_values())
        .init()
        .map_err(anyhow::Error::msg)
        .context("Invalid learning-rate schedule")?;

    let train_batcher = TrainingBatcher::<B>::new(device.clone(), cfg.target_class);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(ImageDataset::new(image));

    let global_step: u64 = 0;
    let mut epochs = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.targets);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

            // Gradients are consumed by the update, nothing accumulates.
            let lr    = schedule.step();
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(lr, model, grads);

            scalars.add_scalar(TRAIN_LOSS_TAG, loss_val, global_step)?;
            loss_sum += loss_val;
            batches  += 1;
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let checkpoint = epoch % cfg.save_every == 0;
        if checkpoint {
            let path = ckpt_manager.save_model(&model, epoch)?;
            tracing::info!("Checkpoint saved for epoch {} at '{}'", epoch, path.display());
        }

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | lr={:.6}",
            epoch, cfg.epochs, train_loss, schedule.current(),
        );
        epochs.push(EpochSummary { epoch, train_loss, lr: schedule.current(), checkpoint });
    }

    // ── Validation phase ──────────────────────────────────────────────────────
    let model_valid = model.valid();
    let accuracy = validate(&model_valid, val_dataset, cfg, model_cfg.input_size, device)
        .context("Validation failed")?;

    scalars.add_scalar(EVAL_ACCURACY_TAG, accuracy, global_step)?;
    println!("Validation accuracy: {:.1}%", accuracy * 100.0);

    tracing::info!("Training complete!");
    Ok(TrainReport { epochs, accuracy })
}

/// Sequential pass over the validation set with the inference-mode model.
fn validate<B: Backend>(
    model:      &Cnn<B>,
    dataset:    ValidationDataset,
    cfg:        &TrainConfig,
    input_size: usize,
    device:     B::Device,
) -> Result<f64> {
    let batcher = ValidationBatcher::<B>::new(device, input_size, input_size);
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.val_batch_size)
        .build(dataset);

    let mut metric = Accuracy::new();
    metric.reset();

    for batch in loader.iter() {
        let batch  = batch?;
        let logits = model.forward(batch.images);
        metric.update(logits, batch.targets);
    }

    tracing::debug!("Validated {} samples", metric.total());
    Ok(metric.accumulate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use crate::infra::{checkpoint::checkpoint_files, scalars::read_scalars};

    type TestBackend = Autodiff<NdArray>;

    fn test_config(epochs: usize, save_every: usize) -> TrainConfig {
        TrainConfig { epochs, save_every, ..TrainConfig::default() }
    }

    fn test_image() -> Image {
        Image::new(vec![0.25; 3 * 28 * 28], 3, 28, 28)
    }

    fn run(
        cfg:         &TrainConfig,
        val_dataset: ValidationDataset,
        dir:         &std::path::Path,
    ) -> (Result<TrainReport>, ScalarWriter) {
        let ckpt    = CheckpointManager::new(dir.join("checkpoints"));
        let scalars = ScalarWriter::new(dir.join("log")).unwrap();
        let result  = train_loop::<TestBackend>(
            cfg, test_image(), val_dataset, &ckpt, &scalars, Default::default(),
        );
        (result, scalars)
    }

    #[test]
    fn test_one_checkpoint_per_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(3, 1);
        let (result, _) = run(&cfg, ValidationDataset::empty(), dir.path());
        let report = result.unwrap();

        let ckpt_dir = dir.path().join("checkpoints");
        for epoch in 1..=3 {
            assert_eq!(checkpoint_files(&ckpt_dir, epoch).unwrap().len(), 1);
        }
        assert!(checkpoint_files(&ckpt_dir, 4).unwrap().is_empty());
        assert!(report.epochs.iter().all(|e| e.checkpoint));
    }

    #[test]
    fn test_save_every_skips_epochs() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(3, 2);
        let (result, _) = run(&cfg, ValidationDataset::empty(), dir.path());
        result.unwrap();

        let ckpt_dir = dir.path().join("checkpoints");
        assert!(checkpoint_files(&ckpt_dir, 1).unwrap().is_empty());
        assert_eq!(checkpoint_files(&ckpt_dir, 2).unwrap().len(), 1);
        assert!(checkpoint_files(&ckpt_dir, 3).unwrap().is_empty());
    }

    #[test]
    fn test_every_logged_scalar_has_step_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(4, 1);
        let (result, scalars) = run(&cfg, ValidationDataset::empty(), dir.path());
        let report = result.unwrap();

        let rows = read_scalars(scalars.csv_path()).unwrap();
        let losses: Vec<_> = rows.iter().filter(|r| r.tag == TRAIN_LOSS_TAG).collect();
        // One batch per epoch: the training set holds a single image.
        assert_eq!(losses.len(), 4);
        assert!(rows.iter().all(|r| r.step == 0));

        let evals: Vec<_> = rows.iter().filter(|r| r.tag == EVAL_ACCURACY_TAG).collect();
        assert_eq!(evals.len(), 1);
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn test_validation_over_path_strings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = test_config(1, 1);
        let val = ValidationDataset::new(&cfg.val_data, &cfg.val_labels);
        let (result, scalars) = run(&cfg, val, dir.path());

        let err = result.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Validation failed"), "{msg}");
        assert!(msg.contains("is not an image"), "{msg}");

        // Training finished and checkpointed before validation broke.
        assert_eq!(checkpoint_files(&dir.path().join("checkpoints"), 1).unwrap().len(), 1);
        let rows = read_scalars(scalars.csv_path()).unwrap();
        assert!(rows.iter().all(|r| r.tag == TRAIN_LOSS_TAG));
    }

    #[test]
    fn test_validation_arguments_do_not_rescue_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { epochs: 1, val_data: String::new(), val_labels: String::new(), ..TrainConfig::default() };
        let val = ValidationDataset::new(&cfg.val_data, &cfg.val_labels);
        let (result, _) = run(&cfg, val, dir.path());

        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("is not an image"), "{msg}");
    }

    #[test]
    fn test_out_of_range_target_class_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig { epochs: 1, target_class: 12, ..TrainConfig::default() };
        let (result, _) = run(&cfg, ValidationDataset::empty(), dir.path());

        assert!(result.is_err());
        assert!(checkpoint_files(&dir.path().join("checkpoints"), 1).unwrap().is_empty());
    }

    #[test]
    fn test_schedule_values_reach_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            epochs:        3,
            lr_boundaries: vec![1],
            lr_values:     Some(vec![1e-3, 1e-4]),
            ..TrainConfig::default()
        };
        let (result, _) = run(&cfg, ValidationDataset::empty(), dir.path());
        let lrs: Vec<f64> = result.unwrap().epochs.iter().map(|e| e.lr).collect();
        assert_eq!(lrs, vec![1e-3, 1e-4, 1e-4]);
    }

    #[test]
    fn test_bad_schedule_is_rejected_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            lr_boundaries: vec![1, 2],
            lr_values:     Some(vec![1e-3]),
            ..TrainConfig::default()
        };
        let (result, _) = run(&cfg, ValidationDataset::empty(), dir.path());
        assert!(result.is_err());
        assert!(checkpoint_files(&dir.path().join("checkpoints"), 1).unwrap().is_empty());
    }
}
