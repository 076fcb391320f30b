// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Two subcommands: `run` and `predict`.
//
// clap's derive macros generate --help text, missing-argument
// errors and string → number conversion for every field.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::benchmark_use_case::PipelineConfig;
use crate::ml::model::ClassifierConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the dataset, train, and report test AUC/accuracy
    Run(RunArgs),

    /// Score structure strings with a saved checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// URL of the ZIP archive holding the dataset table
    #[arg(long, required_unless_present = "offline")]
    pub url: Option<String>,

    /// Directory the archive is extracted into
    #[arg(long, default_value = "data")]
    pub work_dir: PathBuf,

    /// Table path inside the work dir (default: first *.csv.gz found)
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Column holding the structure strings
    #[arg(long, default_value = "smiles")]
    pub smiles_column: String,

    /// Column holding the binary labels
    #[arg(long, default_value = "label")]
    pub label_column: String,

    /// Held-out fraction of rows
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the train/test split and the model
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Download timeout in seconds; 0 waits indefinitely
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,

    /// Skip the download and use files already in the work dir
    #[arg(long)]
    pub offline: bool,

    /// Save the fitted model, loss CSV and report here
    #[arg(long)]
    pub checkpoint_dir: Option<PathBuf>,

    /// Width of the hashed fingerprint
    #[arg(long, default_value_t = 2048)]
    pub fingerprint_dim: usize,

    /// Hidden layer width of the MLP
    #[arg(long, default_value_t = 128)]
    pub hidden_dim: usize,

    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Number of full passes through the training half
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,
}

/// Convert CLI RunArgs into the application-layer PipelineConfig.
/// The application layer never sees clap types.
impl From<RunArgs> for PipelineConfig {
    fn from(a: RunArgs) -> Self {
        let classifier = ClassifierConfig::new()
            .with_fingerprint_dim(a.fingerprint_dim)
            .with_hidden_dim(a.hidden_dim)
            .with_dropout(a.dropout)
            .with_epochs(a.epochs)
            .with_batch_size(a.batch_size)
            .with_lr(a.lr)
            .with_seed(a.seed);

        PipelineConfig {
            url:            a.url.unwrap_or_default(),
            work_dir:       a.work_dir,
            table:          a.table,
            smiles_column:  a.smiles_column,
            label_column:   a.label_column,
            test_fraction:  a.test_fraction,
            seed:           a.seed,
            timeout_secs:   (a.timeout_secs > 0).then_some(a.timeout_secs),
            offline:        a.offline,
            checkpoint_dir: a.checkpoint_dir,
            classifier,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Checkpoint directory written by `run --checkpoint-dir`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: PathBuf,

    /// CSV table (optionally gzip-compressed) with a header row
    #[arg(long)]
    pub input: PathBuf,

    /// Column of the input table holding the structure strings
    #[arg(long, default_value = "smiles")]
    pub smiles_column: String,
}
