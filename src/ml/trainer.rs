// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Mini-batch training of the fingerprint MLP:
//
//   for each epoch:
//     iterate the shuffled DataLoader (reshuffled every epoch)
//     for each batch:
//       forward → BCE on logits → backward → Adam step
//     record mean batch loss
//
// Hyperparameters are checked by ClassifierConfig::validate
// before any layer is built. The loader shuffle and the weight
// init are both seeded from `cfg.seed`.
//
// Training runs on Autodiff<NdArray>; the returned model is
// model.valid(), i.e. the plain NdArray module with dropout
// disabled.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::data::{batcher::FingerprintBatcher, dataset::FingerprintDataset};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{ClassifierConfig, FingerprintMlp};
use crate::ml::{CpuDevice, InferBackend, TrainBackend};

pub fn train_model(
    cfg:     &ClassifierConfig,
    dataset: FingerprintDataset,
    device:  &CpuDevice,
) -> PipelineResult<(FingerprintMlp<InferBackend>, Vec<EpochMetrics>)> {
    cfg.validate()?;
    if dataset.is_empty() {
        return Err(PipelineError::InvalidConfig("training set is empty".to_string()));
    }

    TrainBackend::seed(cfg.seed);

    let mut model: FingerprintMlp<TrainBackend> = cfg.init_model(device);
    tracing::info!(
        "Model ready: fingerprint_dim={}, hidden_dim={}, {} samples ({} positive)",
        cfg.fingerprint_dim,
        cfg.hidden_dim,
        dataset.len(),
        dataset.positives()
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let batcher = FingerprintBatcher::<TrainBackend>::new(device.clone());
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(dataset);

    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(batch.features, batch.targets);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = loss_sum / batches as f64;
        tracing::debug!("Epoch {:>3}/{} | train_loss={:.4}", epoch, cfg.epochs, train_loss);
        history.push(EpochMetrics::new(epoch, train_loss));
    }

    if let Some(last) = history.last() {
        tracing::info!("Training complete, final loss {:.4}", last.train_loss);
    }
    Ok((model.valid(), history))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Two well separated clusters in a 4-dim space
    fn separable() -> FingerprintDataset {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let positive = i % 2 == 0;
            let row = if positive { [1.0, 1.0, 0.0, 0.0] } else { [0.0, 0.0, 1.0, 1.0] };
            features.extend_from_slice(&row);
            labels.push(positive as u8);
        }
        FingerprintDataset::new(features, labels, 4)
    }

    fn small_config() -> ClassifierConfig {
        ClassifierConfig::new()
            .with_fingerprint_dim(4)
            .with_hidden_dim(8)
            .with_dropout(0.0)
            .with_epochs(40)
            .with_batch_size(8)
            .with_lr(1e-2)
    }

    #[test]
    fn test_loss_decreases() {
        let (_, history) = train_model(&small_config(), separable(), &CpuDevice::default()).unwrap();
        assert_eq!(history.len(), 40);
        assert!(history.last().unwrap().train_loss < history[0].train_loss);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let cfg = small_config().with_batch_size(0);
        assert!(matches!(
            train_model(&cfg, separable(), &CpuDevice::default()),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let empty = FingerprintDataset::new(Vec::new(), Vec::new(), 4);
        assert!(train_model(&small_config(), empty, &CpuDevice::default()).is_err());
    }

    #[test]
    fn test_invalid_hyperparameters_rejected() {
        let cases = [
            small_config().with_fingerprint_dim(0),
            small_config().with_hidden_dim(0),
            small_config().with_dropout(1.5),
            small_config().with_lr(0.0),
        ];
        for cfg in cases {
            assert!(matches!(
                train_model(&cfg, separable(), &CpuDevice::default()),
                Err(PipelineError::InvalidConfig(_))
            ));
        }
    }
}
