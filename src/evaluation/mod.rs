//! Test-set scoring: ROC AUC, thresholded accuracy, and the
//! report written at the end of a run.

pub mod metrics;
