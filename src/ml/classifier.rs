// ============================================================
// Layer 5 - Fingerprint Classifier
// ============================================================
// The bundled MoleculeClassifier:
//
//   fit:     structure strings ──featurize──► FingerprintDataset
//                               ──train_model──► FingerprintMlp
//   predict: structure strings ──featurize──► [N, dim] tensor
//                               ──forward──► sigmoid ──► scores
//
// Featurization errors surface unchanged from the featurizer,
// so a single malformed structure string aborts fit/predict.

use std::path::Path;

use burn::{prelude::*, tensor::activation::sigmoid};

use crate::data::{dataset::FingerprintDataset, featurizer::Featurizer};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::{MoleculeClassifier, Persistable};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{ClassifierConfig, FingerprintMlp};
use crate::ml::trainer::train_model;
use crate::ml::{CpuDevice, InferBackend};

/// Rows scored per forward pass in `predict`
const PREDICT_CHUNK: usize = 1024;

pub struct FingerprintClassifier {
    config:     ClassifierConfig,
    featurizer: Featurizer,
    model:      Option<FingerprintMlp<InferBackend>>,
    history:    Vec<EpochMetrics>,
    device:     CpuDevice,
}

impl FingerprintClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let featurizer = Featurizer::new(config.fingerprint_dim);
        Self {
            config,
            featurizer,
            model: None,
            history: Vec::new(),
            device: CpuDevice::default(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Per-epoch training loss of the last `fit`
    pub fn history(&self) -> &[EpochMetrics] {
        &self.history
    }

    #[cfg(test)]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn score_chunk(&self, model: &FingerprintMlp<InferBackend>, inputs: &[String]) -> PipelineResult<Vec<f64>> {
        let features = self.featurizer.featurize_all(inputs)?;
        let x = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(features, [inputs.len(), self.featurizer.dim()]),
            &self.device,
        );
        let probs = sigmoid(model.forward(x));
        let values = probs
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| PipelineError::Resource(format!("reading predictions: {e:?}")))?;
        Ok(values.into_iter().map(f64::from).collect())
    }
}

impl MoleculeClassifier for FingerprintClassifier {
    fn name(&self) -> &str {
        "fingerprint-mlp"
    }

    fn fit(&mut self, inputs: &[String], labels: &[u8]) -> PipelineResult<()> {
        self.config.validate()?;
        if inputs.len() != labels.len() {
            return Err(PipelineError::LengthMismatch {
                labels: labels.len(),
                items:  inputs.len(),
            });
        }

        tracing::info!("Featurizing {} training molecules", inputs.len());
        let features = self.featurizer.featurize_all(inputs)?;
        let dataset = FingerprintDataset::new(features, labels.to_vec(), self.featurizer.dim());

        let (model, history) = train_model(&self.config, dataset, &self.device)?;
        self.model = Some(model);
        self.history = history;
        Ok(())
    }

    fn predict(&self, inputs: &[String]) -> PipelineResult<Vec<f64>> {
        let model = self.model.as_ref().ok_or(PipelineError::NotFitted)?;

        let mut scores = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(PREDICT_CHUNK) {
            scores.extend(self.score_chunk(model, chunk)?);
        }
        Ok(scores)
    }
}

impl Persistable for FingerprintClassifier {
    fn save(&self, dir: &Path) -> PipelineResult<()> {
        let model = self.model.as_ref().ok_or(PipelineError::NotFitted)?;
        let ckpt = CheckpointManager::new(dir)?;
        ckpt.save_classifier_config(&self.config)?;
        ckpt.save_model(model)?;
        tracing::info!("Saved classifier checkpoint to '{}'", dir.display());
        Ok(())
    }

    fn load(dir: &Path) -> PipelineResult<Self> {
        let ckpt = CheckpointManager::open(dir)?;
        let config = ckpt.load_classifier_config()?;
        config.validate()?;

        let mut classifier = Self::new(config);
        let blank = classifier.config().init_model::<InferBackend>(&classifier.device);
        classifier.model = Some(ckpt.load_model(blank, &classifier.device)?);

        tracing::info!("Loaded classifier checkpoint from '{}'", dir.display());
        Ok(classifier)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    /// Halogenated chains (1) vs. plain alcohols/amines (0)
    fn toy_set() -> (Vec<String>, Vec<u8>) {
        let inputs = strings(&[
            "CCCl", "CCCCl", "ClCCCl", "CC(Cl)C", "CCBr", "BrCCBr", "CCCBr", "ClCBr",
            "CCO", "CCCO", "OCCO", "CC(O)C", "CCN", "NCCN", "CCCN", "OCCN",
        ]);
        let labels = vec![1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        (inputs, labels)
    }

    fn small_config() -> ClassifierConfig {
        ClassifierConfig::new()
            .with_fingerprint_dim(64)
            .with_hidden_dim(16)
            .with_dropout(0.0)
            .with_epochs(60)
            .with_batch_size(4)
            .with_lr(1e-2)
    }

    #[test]
    fn test_predict_before_fit() {
        let clf = FingerprintClassifier::new(small_config());
        assert!(matches!(
            clf.predict(&strings(&["CCO"])),
            Err(PipelineError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_then_predict_separates_classes() {
        let (inputs, labels) = toy_set();
        let mut clf = FingerprintClassifier::new(small_config());
        clf.fit(&inputs, &labels).unwrap();
        assert_eq!(clf.history().len(), 60);

        let scores = clf.predict(&inputs).unwrap();
        assert_eq!(scores.len(), inputs.len());
        assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));

        let mean = |want: u8| {
            let picked: Vec<f64> = scores
                .iter()
                .zip(&labels)
                .filter(|(_, &l)| l == want)
                .map(|(&s, _)| s)
                .collect();
            picked.iter().sum::<f64>() / picked.len() as f64
        };
        assert!(mean(1) > mean(0));
    }

    #[test]
    fn test_fit_rejects_malformed_smiles() {
        let mut clf = FingerprintClassifier::new(small_config());
        let err = clf
            .fit(&strings(&["CCO", "C1CC"]), &[0, 1])
            .unwrap_err();
        assert!(matches!(err, PipelineError::Featurization { .. }));
        assert!(!clf.is_fitted());
    }

    #[test]
    fn test_predict_rejects_malformed_smiles() {
        let (inputs, labels) = toy_set();
        let mut clf = FingerprintClassifier::new(small_config().with_epochs(2));
        clf.fit(&inputs, &labels).unwrap();
        assert!(matches!(
            clf.predict(&strings(&["CCO", "C(("])),
            Err(PipelineError::Featurization { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (inputs, labels) = toy_set();
        let mut clf = FingerprintClassifier::new(small_config().with_epochs(5));
        clf.fit(&inputs, &labels).unwrap();

        let dir = tempfile::tempdir().unwrap();
        clf.save(dir.path()).unwrap();

        let restored = FingerprintClassifier::load(dir.path()).unwrap();
        assert_eq!(restored.config().fingerprint_dim, 64);

        let a = clf.predict(&inputs).unwrap();
        let b = restored.predict(&inputs).unwrap();
        for (p, q) in a.iter().zip(&b) {
            assert!((p - q).abs() < 1e-2, "{p} vs {q}");
        }
    }

    #[test]
    fn test_save_unfitted_fails() {
        let dir = tempfile::tempdir().unwrap();
        let clf = FingerprintClassifier::new(small_config());
        assert!(matches!(clf.save(dir.path()), Err(PipelineError::NotFitted)));
    }

    #[test]
    fn test_fit_rejects_invalid_config_before_featurizing() {
        let (inputs, labels) = toy_set();
        let mut clf = FingerprintClassifier::new(small_config().with_fingerprint_dim(0));
        assert!(matches!(
            clf.fit(&inputs, &labels),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let (inputs, labels) = toy_set();
        let mut clf = FingerprintClassifier::new(small_config().with_epochs(2));
        clf.fit(&inputs, &labels).unwrap();

        let dir = tempfile::tempdir().unwrap();
        clf.save(dir.path()).unwrap();
        let ckpt = CheckpointManager::open(dir.path()).unwrap();
        ckpt.save_classifier_config(&small_config().with_dropout(1.5)).unwrap();

        assert!(matches!(
            FingerprintClassifier::load(dir.path()),
            Err(PipelineError::InvalidConfig(_))
        ));
    }
}
