// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the core
// concepts of the benchmark:
//
//   molecule.rs  - a labelled structure string, a dataset,
//                  and the train/test split of a dataset
//   error.rs     - the pipeline error taxonomy
//   traits.rs    - the fit/predict capability every model
//                  plugged into the pipeline implements
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O or network calls
//   - Only data and contracts
//
// Reference: Rust Book §5 (Structs), §9 (Errors), §10 (Traits)

/// Labelled molecules, datasets and splits
pub mod molecule;

/// Error taxonomy shared by every layer
pub mod error;

/// The model adapter contract
pub mod traits;
