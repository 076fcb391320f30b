// ============================================================
// Layer 4 - Fingerprint Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks N fingerprint
// samples of width D into
//
//   features: Tensor [N, D]   (float)
//   targets:  Tensor [N, 1]   (float 0.0 / 1.0)
//
// Targets are float because the loss is binary cross-entropy
// on logits, which multiplies them with the logits directly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::FingerprintSample;

#[derive(Debug, Clone)]
pub struct FingerprintBatch<B: Backend> {
    /// Shape [batch_size, dim]
    pub features: Tensor<B, 2>,

    /// Shape [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct FingerprintBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FingerprintBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FingerprintSample, FingerprintBatch<B>> for FingerprintBatcher<B> {
    fn batch(&self, items: Vec<FingerprintSample>) -> FingerprintBatch<B> {
        let batch_size = items.len();
        let dim = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let targets: Vec<f32> = items.iter().map(|s| s.label as f32).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, dim]),
            &self.device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, 1]),
            &self.device,
        );

        FingerprintBatch { features, targets }
    }
}
