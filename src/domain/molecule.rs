// ============================================================
// Layer 3 - Molecule Domain Types
// ============================================================
// A MoleculeRecord pairs a structure string (SMILES line
// notation) with a binary activity label.
//
//   smiles,label
//   CCO,0
//   c1ccccc1O,1
//
// A Dataset is the ordered list of records read from the
// table; a Split is the train/test partition of a Dataset
// laid out as four parallel vectors, which is the shape the
// model adapter consumes.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One labelled molecule. Identity is the structure string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    /// Line-notation structure string, kept verbatim
    pub smiles: String,

    /// Binary class label, always 0 or 1
    pub label: u8,
}

impl MoleculeRecord {
    pub fn new(smiles: impl Into<String>, label: u8) -> Self {
        Self {
            smiles: smiles.into(),
            label,
        }
    }
}

/// An ordered, load-once collection of molecule records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MoleculeRecord>,
}

impl Dataset {
    pub fn new(records: Vec<MoleculeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MoleculeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records labelled 1
    pub fn positives(&self) -> usize {
        self.records.iter().filter(|r| r.label == 1).count()
    }
}

/// Train/test partition of a Dataset.
///
/// `train_inputs[i]` is labelled `train_labels[i]`, and likewise
/// for the test half. Each half keeps the source row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    pub train_inputs: Vec<String>,
    pub test_inputs:  Vec<String>,
    pub train_labels: Vec<u8>,
    pub test_labels:  Vec<u8>,
}

impl Split {
    pub fn train_len(&self) -> usize {
        self.train_inputs.len()
    }

    pub fn test_len(&self) -> usize {
        self.test_inputs.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_count() {
        let ds = Dataset::new(vec![
            MoleculeRecord::new("CCO", 0),
            MoleculeRecord::new("CCN", 1),
            MoleculeRecord::new("c1ccccc1", 1),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.positives(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.positives(), 0);
    }
}
