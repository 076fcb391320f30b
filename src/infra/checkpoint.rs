// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores a fitted classifier, plus the run
// artefacts written next to it.
//
//   checkpoints/
//     model.mpk               ← MLP weights (CompactRecorder)
//     classifier_config.json  ← ClassifierConfig (burn Config)
//     pipeline_config.json    ← PipelineConfig of the run
//     report.json             ← EvaluationReport of the run
//     metrics.csv             ← per-epoch training loss
//
// The classifier config is needed to rebuild the network with
// the right shape before the weights are loaded into it.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use std::{fs, path::PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::Serialize;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::ml::model::{ClassifierConfig, FingerprintMlp};

const MODEL_FILE: &str = "model";
const CLASSIFIER_CONFIG_FILE: &str = "classifier_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> PipelineResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// Open an existing checkpoint directory without creating it.
    pub fn open(dir: impl Into<PathBuf>) -> PipelineResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(PipelineError::Checkpoint(format!(
                "'{}' is not a checkpoint directory",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    pub fn save_model<B: Backend>(&self, model: &FingerprintMlp<B>) -> PipelineResult<()> {
        let path = self.dir.join(MODEL_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .map_err(|e| {
                PipelineError::Checkpoint(format!("saving '{}': {e:?}", path.display()))
            })?;
        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load weights into `model`, which must have the saved shape.
    pub fn load_model<B: Backend>(
        &self,
        model:  FingerprintMlp<B>,
        device: &B::Device,
    ) -> PipelineResult<FingerprintMlp<B>> {
        let path = self.dir.join(MODEL_FILE);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| {
                PipelineError::Checkpoint(format!("loading '{}': {e:?}", path.display()))
            })?;
        Ok(model.load_record(record))
    }

    pub fn save_classifier_config(&self, cfg: &ClassifierConfig) -> PipelineResult<()> {
        let path = self.dir.join(CLASSIFIER_CONFIG_FILE);
        cfg.save(&path).map_err(|e| PipelineError::io(&path, e))
    }

    pub fn load_classifier_config(&self) -> PipelineResult<ClassifierConfig> {
        let path = self.dir.join(CLASSIFIER_CONFIG_FILE);
        ClassifierConfig::load(&path).map_err(|e| {
            PipelineError::Checkpoint(format!("reading '{}': {e:?}", path.display()))
        })
    }

    /// Write any serializable value as pretty JSON under `name`.
    pub fn save_json<T: Serialize>(&self, name: &str, value: &T) -> PipelineResult<PathBuf> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| PipelineError::Checkpoint(format!("serializing {name}: {e}")))?;
        fs::write(&path, json).map_err(|e| PipelineError::io(&path, e))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::InferBackend;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("ckpt")).unwrap();
        let cfg = ClassifierConfig::new().with_hidden_dim(7).with_epochs(3);
        ckpt.save_classifier_config(&cfg).unwrap();

        let loaded = ckpt.load_classifier_config().unwrap();
        assert_eq!(loaded.hidden_dim, 7);
        assert_eq!(loaded.epochs, 3);
        assert_eq!(loaded.fingerprint_dim, cfg.fingerprint_dim);
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();
        let cfg = ClassifierConfig::new().with_fingerprint_dim(6).with_hidden_dim(4);

        let model = cfg.init_model::<InferBackend>(&device);
        ckpt.save_model(&model).unwrap();

        let fresh = cfg.init_model::<InferBackend>(&device);
        let restored = ckpt.load_model(fresh, &device).unwrap();

        let x = Tensor::<InferBackend, 2>::ones([2, 6], &device);
        let a: Vec<f32> = model.forward(x.clone()).into_data().to_vec().unwrap();
        let b: Vec<f32> = restored.forward(x).into_data().to_vec().unwrap();
        for (p, q) in a.iter().zip(&b) {
            // CompactRecorder stores half precision
            assert!((p - q).abs() < 1e-2, "{p} vs {q}");
        }
    }

    #[test]
    fn test_open_missing_dir() {
        assert!(matches!(
            CheckpointManager::open("/nonexistent/ckpt"),
            Err(PipelineError::Checkpoint(_))
        ));
    }
}
