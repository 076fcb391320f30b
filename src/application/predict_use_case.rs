// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Scores new structure strings with a classifier saved by a
// previous `run --checkpoint-dir ...`.
//
// Input file: a CSV table with a header row (gzip when it ends
// in ".gz"), read by the same loader as the training table.
// Only the structure column is used.

use std::path::Path;

use anyhow::{Context, Result};

use crate::data::loader::TableLoader;
use crate::domain::traits::{MoleculeClassifier, Persistable};
use crate::ml::classifier::FingerprintClassifier;

pub struct PredictUseCase<C: MoleculeClassifier = FingerprintClassifier> {
    classifier: C,
}

impl PredictUseCase<FingerprintClassifier> {
    /// Load the classifier from a checkpoint directory.
    pub fn from_checkpoint(dir: &Path) -> Result<Self> {
        let classifier = FingerprintClassifier::load(dir)
            .with_context(|| format!("Cannot load checkpoint '{}'. Have you run 'run --checkpoint-dir' first?", dir.display()))?;
        Ok(Self::with_classifier(classifier))
    }
}

impl<C: MoleculeClassifier> PredictUseCase<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Score the `smiles_column` cells of the table at `path`.
    pub fn score_file(&self, path: &Path, smiles_column: &str) -> Result<Vec<(String, f64)>> {
        let inputs = TableLoader::new(path)
            .with_smiles_column(smiles_column)
            .load_structures()
            .with_context(|| format!("Cannot read structures from '{}'", path.display()))?;
        self.score(inputs)
    }

    pub fn score(&self, inputs: Vec<String>) -> Result<Vec<(String, f64)>> {
        tracing::info!("Scoring {} molecules with {}", inputs.len(), self.classifier.name());
        let scores = self.classifier.predict(&inputs)?;
        Ok(inputs.into_iter().zip(scores).collect())
    }
}
