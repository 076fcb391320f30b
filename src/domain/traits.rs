// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The model adapter is the one place where the pipeline
// consumes behaviour it does not specify. Anything that can
// learn from labelled structure strings and score new ones
// implements MoleculeClassifier:
//
//   - FingerprintClassifier (ml/classifier.rs), the bundled
//     hashed-fingerprint MLP
//   - test stubs returning fixed score vectors
//
// The application layer only ever sees this trait.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use crate::domain::error::PipelineResult;

// ─── MoleculeClassifier ───────────────────────────────────────────────────────
/// A binary classifier over structure strings.
pub trait MoleculeClassifier {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Train on `inputs` with the positionally aligned `labels`.
    /// Fails with `Featurization` on an unparseable input and
    /// `Resource` when training memory cannot be allocated.
    fn fit(&mut self, inputs: &[String], labels: &[u8]) -> PipelineResult<()>;

    /// Score every input; the output has one value per input in
    /// the same order. Higher means more likely positive.
    fn predict(&self, inputs: &[String]) -> PipelineResult<Vec<f64>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// A component whose state can be written to and restored from
/// a directory.
pub trait Persistable: Sized {
    fn save(&self, dir: &Path) -> PipelineResult<()>;

    fn load(dir: &Path) -> PipelineResult<Self>;
}
