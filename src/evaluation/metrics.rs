// ============================================================
// Evaluation Metrics
// ============================================================
// Pure functions comparing true binary labels with predicted
// scores.
//
//   roc_auc  - Mann-Whitney U statistic over average ranks:
//
//                  R+ - n+(n+ + 1)/2
//              AUC = ─────────────────
//                      n+ · n-
//
//              where R+ is the rank sum of the positives. Tied
//              scores share their average rank, so a tie counts
//              as half a correctly ordered pair.
//
//   accuracy - fraction of rows where (score > 0.5) equals
//              the label
//
// Both fail on empty or misaligned input; AUC also fails when
// only one class is present.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

pub const DECISION_THRESHOLD: f64 = 0.5;

fn check_aligned(labels: &[u8], scores: &[f64]) -> PipelineResult<()> {
    if labels.len() != scores.len() {
        return Err(PipelineError::LengthMismatch {
            labels: labels.len(),
            items:  scores.len(),
        });
    }
    if labels.is_empty() {
        return Err(PipelineError::DegenerateInput("no labels to score".to_string()));
    }
    Ok(())
}

/// Area under the ROC curve.
pub fn roc_auc(labels: &[u8], scores: &[f64]) -> PipelineResult<f64> {
    check_aligned(labels, scores)?;
    if scores.iter().any(|s| s.is_nan()) {
        return Err(PipelineError::DegenerateInput("scores contain NaN".to_string()));
    }

    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(PipelineError::DegenerateInput(
            "ROC AUC is undefined when only one class is present".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // 1-based average ranks, ties grouped
    let mut ranks = vec![0.0f64; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let avg = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = avg;
        }
        start = end;
    }

    let pos_rank_sum: f64 = ranks
        .iter()
        .zip(labels)
        .filter(|(_, &l)| l == 1)
        .map(|(&r, _)| r)
        .sum();

    let (p, n) = (n_pos as f64, n_neg as f64);
    Ok((pos_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

/// Fraction of rows where `score > 0.5` matches the label.
pub fn accuracy(labels: &[u8], scores: &[f64]) -> PipelineResult<f64> {
    check_aligned(labels, scores)?;
    let correct = labels
        .iter()
        .zip(scores)
        .filter(|(&l, &s)| u8::from(s > DECISION_THRESHOLD) == l)
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// The two test-set metrics of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub auc:      f64,
    pub accuracy: f64,
}

impl MetricResult {
    pub fn compute(labels: &[u8], scores: &[f64]) -> PipelineResult<Self> {
        Ok(Self {
            auc:      roc_auc(labels, scores)?,
            accuracy: accuracy(labels, scores)?,
        })
    }

    /// `test auc=<v> acc=<v>` with six significant digits
    pub fn summary_line(&self) -> String {
        format!(
            "test auc={} acc={}",
            format_significant(self.auc, 6),
            format_significant(self.accuracy, 6)
        )
    }
}

/// Everything a run reports, saved as report.json next to the
/// checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model_name:    String,
    pub n_train:       usize,
    pub n_test:        usize,
    pub test_fraction: f64,
    pub seed:          u64,
    pub metrics:       MetricResult,
}

/// `%g`-style formatting: `sig` significant digits, trailing
/// zeros dropped, exponent form outside [1e-4, 10^sig).
pub fn format_significant(value: f64, sig: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sig = sig.max(1);
    // Round first so the exponent reflects e.g. 9.9999996 → 10
    let sci = format!("{:.*e}", sig - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= sig as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (sig as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
