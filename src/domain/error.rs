// ============================================================
// Layer 3 - Pipeline Errors
// ============================================================
// Every failure the pipeline can raise. Nothing in the
// pipeline recovers from these: the application layer wraps
// them in anyhow and the process exits.
//
//   Network         - fetch failed or returned non-success
//   Archive         - downloaded payload is not a ZIP archive
//   Format          - table unreadable or columns missing
//   Featurization   - structure string cannot be parsed
//   Resource        - allocation failed during fit/predict
//   DegenerateInput - metric undefined for the given labels
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("network error fetching '{url}': {reason}")]
    Network { url: String, reason: String },

    #[error("invalid archive: {0}")]
    Archive(String),

    #[error("format error in '{path}': {reason}")]
    Format { path: String, reason: String },

    #[error("cannot featurize molecule {smiles:?}: {reason}")]
    Featurization { smiles: String, reason: String },

    #[error("resource exhausted: {0}")]
    Resource(String),

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("length mismatch: {labels} labels for {items} items")]
    LengthMismatch { labels: usize, items: usize },

    #[error("model has not been fitted")]
    NotFitted,

    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    #[error("I/O error at '{}': {}", .path.display(), .source)]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn format(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            path:   path.into(),
            reason: reason.into(),
        }
    }

    pub fn featurization(smiles: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Featurization {
            smiles: smiles.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
