// ============================================================
// Layer 6 - Training Metrics Logger
// ============================================================
// Records the mean training loss of every epoch to a CSV file
// inside the checkpoint directory:
//
//   epoch,train_loss
//   1,0.693147
//   2,0.641220
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean binary cross-entropy over the epoch's batches
    pub train_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64) -> Self {
        Self { epoch, train_loss }
    }
}

/// Writes epoch metrics to `<dir>/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Starts a fresh CSV holding only the header. Rows of an
    /// earlier run in the same directory are discarded.
    pub fn create(dir: &Path) -> PipelineResult<Self> {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path).map_err(|e| PipelineError::io(&csv_path, e))?;
        writeln!(f, "epoch,train_loss").map_err(|e| PipelineError::io(&csv_path, e))?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> PipelineResult<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| PipelineError::io(&self.csv_path, e))?;

        writeln!(f, "{},{:.6}", m.epoch, m.train_loss)
            .map_err(|e| PipelineError::io(&self.csv_path, e))
    }

    pub fn log_all(&self, history: &[EpochMetrics]) -> PipelineResult<()> {
        history.iter().try_for_each(|m| self.log(m))
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
