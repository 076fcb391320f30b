use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fingerprinted molecule with its binary target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintSample {
    pub features: Vec<f32>,
    pub label:    u8,
}

/// Row-major fingerprint matrix plus labels, indexable through
/// burn's Dataset trait.
pub struct FingerprintDataset {
    features: Vec<f32>,
    labels:   Vec<u8>,
    dim:      usize,
}

impl FingerprintDataset {
    /// `features.len()` must equal `labels.len() * dim`.
    pub fn new(features: Vec<f32>, labels: Vec<u8>, dim: usize) -> Self {
        debug_assert_eq!(features.len(), labels.len() * dim);
        Self { features, labels, dim }
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }
}

impl Dataset<FingerprintSample> for FingerprintDataset {
    fn get(&self, index: usize) -> Option<FingerprintSample> {
        let label = *self.labels.get(index)?;
        let start = index * self.dim;
        Some(FingerprintSample {
            features: self.features[start..start + self.dim].to_vec(),
            label,
        })
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_rows() {
        let ds = FingerprintDataset::new(vec![1.0, 2.0, 3.0, 4.0], vec![0, 1], 2);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.positives(), 1);
        let s = ds.get(1).unwrap();
        assert_eq!(s.features, vec![3.0, 4.0]);
        assert_eq!(s.label, 1);
        assert!(ds.get(2).is_none());
    }
}
