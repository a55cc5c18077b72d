// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "handwriting-ocr-train",
    version,
    about = "Train a small CNN on one handwritten digit image with Burn."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
        }
    }
}

/// Converts CLI args into a TrainConfig and runs the use case.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on image: {}", args.image);

    let report = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epochs. Validation accuracy: {:.1}%",
        report.epochs.len(),
        report.accuracy * 100.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_defaults_match_train_config() {
        let cli = Cli::try_parse_from(["handwriting-ocr-train", "train"]).unwrap();
        let Commands::Train(args) = cli.command;
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.image_path, def.image_path);
        assert_eq!(cfg.val_labels, def.val_labels);
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.lr, def.lr);
        assert!(cfg.lr_boundaries.is_empty());
        assert!(cfg.lr_values.is_none());
    }

    #[test]
    fn test_schedule_lists_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "handwriting-ocr-train", "train",
            "--lr-boundaries", "5,8",
            "--lr-values", "0.01,0.001,0.0001",
            "--epochs", "3",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command;
        assert_eq!(args.lr_boundaries, vec![5, 8]);
        assert_eq!(args.lr_values, Some(vec![0.01, 0.001, 0.0001]));
        assert_eq!(args.epochs, 3);
    }
}
