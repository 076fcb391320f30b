// ============================================================
// Layer 5 - ML Layer (Burn)
// ============================================================
// The bundled baseline model behind the MoleculeClassifier
// trait. All burn-specific model code lives here; the rest of
// the crate only sees the trait.
//
//   model.rs      - ClassifierConfig and the fingerprint MLP
//                   Linear → ReLU → Dropout (x2) → Linear(1)
//
//   trainer.rs    - mini-batch training loop: BCE on logits,
//                   Adam, seeded per-epoch shuffling
//
//   classifier.rs - FingerprintClassifier, the adapter that
//                   featurizes structure strings, trains and
//                   scores them, and saves/loads checkpoints
//
// Backends: NdArray (CPU) for inference, Autodiff<NdArray>
// for training.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Fingerprint MLP architecture and hyperparameters
pub mod model;

/// Training loop
pub mod trainer;

/// MoleculeClassifier implementation
pub mod classifier;

pub type InferBackend = burn::backend::NdArray;
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;
pub type CpuDevice = burn::backend::ndarray::NdArrayDevice;
