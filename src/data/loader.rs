// ============================================================
// Layer 4 - Table Loader
// ============================================================
// Reads the labelled molecule table into a Dataset.
//
// The table is CSV with a header row, usually gzip-compressed:
//
//   smiles,label,<other columns ignored>
//   CC(=O)Oc1ccccc1C(=O)O,1
//   ...
//
// Files ending in ".gz" are streamed through flate2's
// GzDecoder; anything else is read as plain CSV.
//
// Column presence is checked against the header before any
// row is parsed, so a table without the label column fails
// with PipelineError::Format and never reaches the splitter.
//
// `load_structures` reads the same kind of table for scoring:
// only the structure column is required and labels, if any,
// are ignored.
//
// Reference: csv crate documentation
//            flate2 crate documentation

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::molecule::{Dataset, MoleculeRecord};

pub const DEFAULT_SMILES_COLUMN: &str = "smiles";
pub const DEFAULT_LABEL_COLUMN: &str = "label";

/// Loads a structure/label table from disk.
pub struct TableLoader {
    path:          PathBuf,
    smiles_column: String,
    label_column:  String,
}

impl TableLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:          path.into(),
            smiles_column: DEFAULT_SMILES_COLUMN.to_string(),
            label_column:  DEFAULT_LABEL_COLUMN.to_string(),
        }
    }

    pub fn with_columns(mut self, smiles: impl Into<String>, label: impl Into<String>) -> Self {
        self.smiles_column = smiles.into();
        self.label_column = label.into();
        self
    }

    pub fn with_smiles_column(mut self, smiles: impl Into<String>) -> Self {
        self.smiles_column = smiles.into();
        self
    }

    pub fn load(&self) -> PipelineResult<Dataset> {
        let dataset = self.read_table(self.open()?)?;
        tracing::info!(
            "Loaded {} molecules ({} positive) from '{}'",
            dataset.len(),
            dataset.positives(),
            self.path.display()
        );
        Ok(dataset)
    }

    /// Structure strings of the table, in row order, for scoring.
    pub fn load_structures(&self) -> PipelineResult<Vec<String>> {
        let structures = self.read_structures(self.open()?)?;
        tracing::info!("Read {} structures from '{}'", structures.len(), self.path.display());
        Ok(structures)
    }

    fn open(&self) -> PipelineResult<Box<dyn Read>> {
        let file = File::open(&self.path).map_err(|e| PipelineError::io(&self.path, e))?;
        Ok(if is_gzip(&self.path) {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        })
    }

    /// Parse an already opened CSV stream.
    pub fn read_table<R: Read>(&self, reader: R) -> PipelineResult<Dataset> {
        let bad = |reason: String| PipelineError::format(self.path.display().to_string(), reason);

        let mut csv_reader = csv_reader(reader);
        let smiles_idx = self.column_index(&mut csv_reader, &self.smiles_column)?;
        let label_idx = self.column_index(&mut csv_reader, &self.label_column)?;

        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            let row_no = i + 1;
            let row = row.map_err(|e| bad(format!("row {row_no}: {e}")))?;

            let smiles = row
                .get(smiles_idx)
                .ok_or_else(|| bad(format!("row {row_no}: missing structure cell")))?;
            let raw_label = row
                .get(label_idx)
                .ok_or_else(|| bad(format!("row {row_no}: missing label cell")))?;
            let label = parse_label(raw_label)
                .ok_or_else(|| bad(format!("row {row_no}: label {raw_label:?} is not binary")))?;

            records.push(MoleculeRecord::new(smiles, label));
        }

        let dataset = Dataset::new(records);
        if dataset.is_empty() {
            return Err(bad("table has no data rows".to_string()));
        }
        Ok(dataset)
    }

    /// Parse the structure column of an already opened CSV stream.
    pub fn read_structures<R: Read>(&self, reader: R) -> PipelineResult<Vec<String>> {
        let bad = |reason: String| PipelineError::format(self.path.display().to_string(), reason);

        let mut csv_reader = csv_reader(reader);
        let smiles_idx = self.column_index(&mut csv_reader, &self.smiles_column)?;

        let mut structures = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            let row_no = i + 1;
            let row = row.map_err(|e| bad(format!("row {row_no}: {e}")))?;
            let smiles = row
                .get(smiles_idx)
                .ok_or_else(|| bad(format!("row {row_no}: missing structure cell")))?;
            structures.push(smiles.to_string());
        }

        if structures.is_empty() {
            return Err(bad("table has no data rows".to_string()));
        }
        Ok(structures)
    }

    fn column_index<R: Read>(&self, csv_reader: &mut csv::Reader<R>, name: &str) -> PipelineResult<usize> {
        let bad = |reason: String| PipelineError::format(self.path.display().to_string(), reason);
        csv_reader
            .headers()
            .map_err(|e| bad(format!("cannot read header: {e}")))?
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| bad(format!("missing required column '{name}'")))
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Accepts 0/1, 0.0/1.0 and true/false.
fn parse_label(raw: &str) -> Option<u8> {
    match raw.to_ascii_lowercase().as_str() {
        "0" | "false" => Some(0),
        "1" | "true" => Some(1),
        other => match other.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(0),
            Ok(v) if v == 1.0 => Some(1),
            _ => None,
        },
    }
}
