// ============================================================
// Layer 2 - BenchmarkUseCase
// ============================================================
// Orchestrates one benchmark run, strictly in order:
//
//   Step 1: Download + extract the archive   (data::fetcher)
//   Step 2: Locate and load the table        (data::loader)
//   Step 3: Train/test split                 (data::splitter)
//   Step 4: fit on the training half         (MoleculeClassifier)
//   Step 5: predict the test half            (MoleculeClassifier)
//   Step 6: AUC + accuracy                   (evaluation::metrics)
//   Step 7: Save checkpoint + artefacts      (infra, optional)
//
// Any error ends the run; nothing is retried.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    fetcher::{find_table, DatasetFetcher},
    loader::{TableLoader, DEFAULT_LABEL_COLUMN, DEFAULT_SMILES_COLUMN},
    splitter::{split_train_test, DEFAULT_SEED, DEFAULT_TEST_FRACTION},
};
use crate::domain::error::PipelineResult;
use crate::domain::molecule::Dataset;
use crate::domain::traits::{MoleculeClassifier, Persistable};
use crate::evaluation::metrics::{EvaluationReport, MetricResult};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::MetricsLogger;
use crate::ml::classifier::FingerprintClassifier;
use crate::ml::model::ClassifierConfig;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
// Everything a run needs. Serialised next to the checkpoint so a
// run can be traced back to its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Archive URL; unused when `offline`
    pub url:            String,
    pub work_dir:       PathBuf,
    /// Table path relative to `work_dir`; discovered when None
    pub table:          Option<PathBuf>,
    pub smiles_column:  String,
    pub label_column:   String,
    pub test_fraction:  f64,
    pub seed:           u64,
    /// None waits for the download indefinitely
    pub timeout_secs:   Option<u64>,
    /// Skip the download and read an already extracted work dir
    pub offline:        bool,
    pub checkpoint_dir: Option<PathBuf>,
    pub classifier:     ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            url:            String::new(),
            work_dir:       PathBuf::from("data"),
            table:          None,
            smiles_column:  DEFAULT_SMILES_COLUMN.to_string(),
            label_column:   DEFAULT_LABEL_COLUMN.to_string(),
            test_fraction:  DEFAULT_TEST_FRACTION,
            seed:           DEFAULT_SEED,
            timeout_secs:   Some(300),
            offline:        false,
            checkpoint_dir: None,
            classifier:     ClassifierConfig::new(),
        }
    }
}

// ─── BenchmarkUseCase ─────────────────────────────────────────────────────────
pub struct BenchmarkUseCase {
    config: PipelineConfig,
}

impl BenchmarkUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run with the bundled fingerprint classifier and persist it
    /// when a checkpoint directory is configured.
    pub fn execute(&self) -> Result<EvaluationReport> {
        let mut classifier = FingerprintClassifier::new(self.config.classifier.clone());
        let report = self.execute_with(&mut classifier)?;

        if let Some(dir) = &self.config.checkpoint_dir {
            classifier.save(dir)?;
            let metrics = MetricsLogger::create(dir)?;
            metrics.log_all(classifier.history())?;
            tracing::debug!("Epoch losses written to '{}'", metrics.csv_path().display());

            let ckpt = CheckpointManager::new(dir)?;
            ckpt.save_json("pipeline_config.json", &self.config)?;
            ckpt.save_json("report.json", &report)?;
            tracing::info!("Run artefacts written to '{}'", dir.display());
        }

        Ok(report)
    }

    /// Run the pipeline with any classifier.
    pub fn execute_with<C: MoleculeClassifier>(&self, classifier: &mut C) -> Result<EvaluationReport> {
        let dataset = self.acquire_dataset()?;
        let report = evaluate_classifier(
            &dataset,
            classifier,
            self.config.test_fraction,
            self.config.seed,
        )?;
        Ok(report)
    }

    /// Steps 1-2: download (unless offline), locate and load the table.
    fn acquire_dataset(&self) -> Result<Dataset> {
        let cfg = &self.config;

        if cfg.offline {
            tracing::info!("Offline: using existing files in '{}'", cfg.work_dir.display());
        } else {
            let fetcher = DatasetFetcher::new(cfg.timeout_secs.map(Duration::from_secs))?;
            fetcher.fetch(&cfg.url, &cfg.work_dir)?;
        }

        let table = match &cfg.table {
            Some(rel) => cfg.work_dir.join(rel),
            None => find_table(&cfg.work_dir)?,
        };

        let dataset = TableLoader::new(&table)
            .with_columns(&cfg.smiles_column, &cfg.label_column)
            .load()
            .with_context(|| format!("loading '{}'", table.display()))?;
        Ok(dataset)
    }
}

/// Steps 3-6: split, fit, predict, score.
pub fn evaluate_classifier<C: MoleculeClassifier>(
    dataset:       &Dataset,
    classifier:    &mut C,
    test_fraction: f64,
    seed:          u64,
) -> PipelineResult<EvaluationReport> {
    let split = split_train_test(dataset, test_fraction, seed)?;
    tracing::info!(
        "Split: {} train, {} test",
        split.train_len(),
        split.test_len()
    );

    tracing::info!("Fitting {}", classifier.name());
    classifier.fit(&split.train_inputs, &split.train_labels)?;

    let scores = classifier.predict(&split.test_inputs)?;
    let metrics = MetricResult::compute(&split.test_labels, &scores)?;
    tracing::info!("AUC {:.4}, accuracy {:.4}", metrics.auc, metrics.accuracy);

    Ok(EvaluationReport {
        model_name: classifier.name().to_string(),
        n_train: split.train_len(),
        n_test: split.test_len(),
        test_fraction,
        seed,
        metrics,
    })
}
