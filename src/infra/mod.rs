// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the application layer:
//
//   checkpoint.rs - model weights (burn CompactRecorder),
//                   classifier config, and JSON artefacts
//                   (pipeline config, evaluation report)
//
//   metrics.rs    - per-epoch training loss appended to a
//                   CSV file for later plotting
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training loss CSV logger
pub mod metrics;
