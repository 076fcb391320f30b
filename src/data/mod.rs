// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between the remote archive and the tensors the
// baseline classifier trains on:
//
//   remote ZIP
//       │  fetcher      (reqwest + zip)
//       ▼
//   extracted .csv.gz
//       │  loader       (flate2 + csv)
//       ▼
//   Dataset
//       │  splitter     (seeded ChaCha8 shuffle)
//       ▼
//   Split ── train/test inputs + labels
//       │  featurizer   (SMILES tokens → hashed fingerprint)
//       ▼
//   FingerprintDataset
//       │  batcher      (burn Batcher)
//       ▼
//   FingerprintBatch tensors
//
// Reference: Burn Book §4 (Datasets and Batchers)

/// Downloads and extracts the dataset archive
pub mod fetcher;

/// Reads the labelled table into a Dataset
pub mod loader;

/// Seeded train/test partition
pub mod splitter;

/// SMILES tokenizer and hashed fingerprint
pub mod featurizer;

/// Implements burn's Dataset trait over fingerprint rows
pub mod dataset;

/// Implements burn's Batcher trait to build tensor batches
pub mod batcher;
