// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the `train` subcommand and its flags. Defaults are
// the constants of the reference training run.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the CNN on the single image, then run validation
    Train(TrainArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Image file used as the one training sample
    #[arg(long, default_value = "/content/7/7.jpeg")]
    pub image: String,

    /// Handed to the validation set, which keeps its fixed data path instead
    #[arg(long, default_value = "/content/7/7.jpeg")]
    pub val_data: String,

    /// Handed to the validation set, which keeps its fixed labels path instead
    #[arg(long, default_value = "/content/7/7test.txt")]
    pub val_labels: String,

    /// Directory for model checkpoints and the saved config
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Directory for the scalar log
    #[arg(long, default_value = "log")]
    pub log_dir: String,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 32)]
    pub val_batch_size: usize,

    /// Adam learning rate (the constant schedule value)
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Save a checkpoint every N epochs
    #[arg(long, default_value_t = 1)]
    pub save_every: usize,

    /// Class index paired with the unlabeled training image
    #[arg(long, default_value_t = 7)]
    pub target_class: usize,

    /// Seed for the training loader's shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Piecewise schedule boundaries, e.g. `--lr-boundaries 100,200`
    #[arg(long, value_delimiter = ',')]
    pub lr_boundaries: Vec<usize>,

    /// Piecewise schedule values, one more than the boundaries
    #[arg(long, value_delimiter = ',')]
    pub lr_values: Option<Vec<f64>>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            image_path:     a.image,
            val_data:       a.val_data,
            val_labels:     a.val_labels,
            checkpoint_dir: a.checkpoint_dir,
            log_dir:        a.log_dir,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            val_batch_size: a.val_batch_size,
            lr:             a.lr,
            save_every:     a.save_every,
            target_class:   a.target_class,
            seed:           a.seed,
            lr_boundaries:  a.lr_boundaries,
            lr_values:      a.lr_values,
        }
    }
}
