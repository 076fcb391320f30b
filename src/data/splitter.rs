// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Partitions a Dataset into a training half and a held-out
// test half:
//
//   1. Shuffle the row indices 0..n with a ChaCha8 RNG seeded
//      from `seed` (Fisher-Yates via SliceRandom::shuffle)
//   2. The first ceil(n * test_fraction) indices are the test
//      rows, the rest are the training rows
//   3. Sort each index set so both halves keep source order
//
// The same seed on the same table always yields the same
// split. No stratification: class balance in each half is
// whatever the shuffle produces.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::molecule::{Dataset, Split};

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Split `dataset` into train/test halves.
///
/// # Errors
/// `InvalidConfig` when `test_fraction` is not in (0, 1) or when
/// either half would be empty.
pub fn split_train_test(dataset: &Dataset, test_fraction: f64, seed: u64) -> PipelineResult<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidConfig(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let total = dataset.len();
    let n_test = ((total as f64) * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= total {
        return Err(PipelineError::InvalidConfig(format!(
            "cannot split {total} rows with test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..total).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut train_idx = indices.split_off(n_test);
    let mut test_idx = indices;
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    let records = dataset.records();
    let mut split = Split::default();
    for &i in &train_idx {
        split.train_inputs.push(records[i].smiles.clone());
        split.train_labels.push(records[i].label);
    }
    for &i in &test_idx {
        split.test_inputs.push(records[i].smiles.clone());
        split.test_labels.push(records[i].label);
    }

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        split.train_len(),
        split.test_len(),
        seed
    );

    Ok(split)
}
