// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: each use case calls into the
// data, ml, evaluation and infra layers in order and returns
// a result for the CLI to print.
//
//   benchmark_use_case - fetch → load → split → fit →
//                        predict → score (→ persist)
//   predict_use_case   - load checkpoint → score structure
//                        strings from a file
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// The end-to-end benchmark run
pub mod benchmark_use_case;

/// Scoring with a saved checkpoint
pub mod predict_use_case;
