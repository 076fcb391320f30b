// ============================================================
// Layer 4 - SMILES Featurizer
// ============================================================
// Turns a structure string into a fixed-length fingerprint
// vector for the baseline classifier.
//
//   "CC(=O)Cl"
//       │  tokenize
//       ▼
//   [C, C, (, =, O, ), Cl]
//       │  1/2/3-grams, FNV-1a hash mod dim
//       ▼
//   counts[dim]
//       │  ln(1 + c)
//       ▼
//   fingerprint: Vec<f32>
//
// The tokenizer only checks that the string is lexically
// well formed: known tokens, closed brackets, balanced
// branches, paired ring closures. It does not check valence
// or aromaticity.
//
// Ring-closure labels are reused arbitrarily inside a SMILES
// string, so every closure emits the same "ring" token.

use std::collections::HashSet;

use crate::domain::error::{PipelineError, PipelineResult};

const RING_TOKEN: &str = "<ring>";
const MAX_NGRAM: usize = 3;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Split a SMILES string into tokens.
pub fn tokenize(smiles: &str) -> PipelineResult<Vec<String>> {
    let fail = |reason: String| PipelineError::featurization(smiles, reason);

    if smiles.is_empty() {
        return Err(fail("empty structure string".to_string()));
    }

    let chars: Vec<char> = smiles.chars().collect();
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut open_rings: HashSet<u32> = HashSet::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let close = i + 1 + chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']' || ch == '[')
                    .ok_or_else(|| fail(format!("unclosed bracket atom at {i}")))?;
                if chars[close] == '[' {
                    return Err(fail(format!("bracket atom at {i} opens another at {close}")));
                }
                if close == i + 1 {
                    return Err(fail(format!("empty bracket atom at {i}")));
                }
                tokens.push(chars[i..=close].iter().collect());
                i = close + 1;
                continue;
            }
            'C' if chars.get(i + 1) == Some(&'l') => {
                tokens.push("Cl".to_string());
                i += 2;
                continue;
            }
            'B' if chars.get(i + 1) == Some(&'r') => {
                tokens.push("Br".to_string());
                i += 2;
                continue;
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p'
            | 's' | '*' => tokens.push(c.to_string()),
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' | '.' => tokens.push(c.to_string()),
            '(' => {
                depth += 1;
                tokens.push(c.to_string());
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| fail(format!("unbalanced ')' at {i}")))?;
                tokens.push(c.to_string());
            }
            '0'..='9' => {
                toggle_ring(&mut open_rings, c as u32 - '0' as u32);
                tokens.push(RING_TOKEN.to_string());
            }
            '%' => {
                let label = match (chars.get(i + 1), chars.get(i + 2)) {
                    (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                        (*a as u32 - '0' as u32) * 10 + (*b as u32 - '0' as u32)
                    }
                    _ => return Err(fail(format!("malformed ring label at {i}"))),
                };
                toggle_ring(&mut open_rings, label);
                tokens.push(RING_TOKEN.to_string());
                i += 3;
                continue;
            }
            other => return Err(fail(format!("unexpected character {other:?} at {i}"))),
        }
        i += 1;
    }

    if depth != 0 {
        return Err(fail(format!("{depth} unclosed branch(es)")));
    }
    if !open_rings.is_empty() {
        let mut labels: Vec<u32> = open_rings.into_iter().collect();
        labels.sort_unstable();
        return Err(fail(format!("unclosed ring label(s) {labels:?}")));
    }

    Ok(tokens)
}

fn toggle_ring(open: &mut HashSet<u32>, label: u32) {
    if !open.remove(&label) {
        open.insert(label);
    }
}

fn fnv1a(parts: &[String]) -> u64 {
    let mut hash = FNV_OFFSET;
    for (k, part) in parts.iter().enumerate() {
        if k > 0 {
            hash ^= 0x1f;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        for byte in part.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Hashed token n-gram fingerprint of fixed width.
#[derive(Debug, Clone, Copy)]
pub struct Featurizer {
    dim: usize,
}

impl Featurizer {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Fingerprint of a single structure string.
    #[cfg(test)]
    pub fn featurize(&self, smiles: &str) -> PipelineResult<Vec<f32>> {
        let mut row = vec![0.0f32; self.dim];
        self.fill_row(smiles, &mut row)?;
        Ok(row)
    }

    /// Row-major `[inputs.len(), dim]` fingerprint matrix.
    ///
    /// The buffer is reserved up front; an allocation failure is
    /// reported as `PipelineError::Resource`.
    pub fn featurize_all(&self, inputs: &[String]) -> PipelineResult<Vec<f32>> {
        let cells = inputs.len().checked_mul(self.dim).ok_or_else(|| {
            PipelineError::Resource(format!("{} x {} fingerprint matrix", inputs.len(), self.dim))
        })?;

        let mut matrix: Vec<f32> = Vec::new();
        matrix.try_reserve_exact(cells).map_err(|e| {
            PipelineError::Resource(format!(
                "cannot allocate {} x {} fingerprint matrix: {e}",
                inputs.len(),
                self.dim
            ))
        })?;
        matrix.resize(cells, 0.0);

        for (smiles, row) in inputs.iter().zip(matrix.chunks_mut(self.dim)) {
            self.fill_row(smiles, row)?;
        }
        Ok(matrix)
    }

    fn fill_row(&self, smiles: &str, row: &mut [f32]) -> PipelineResult<()> {
        let tokens = tokenize(smiles)?;
        for n in 1..=MAX_NGRAM {
            for gram in tokens.windows(n) {
                let bucket = (fnv1a(gram) % self.dim as u64) as usize;
                row[bucket] += 1.0;
            }
        }
        for v in row.iter_mut() {
            *v = v.ln_1p();
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s).unwrap()
    }

    #[test]
    fn test_tokenizes_halogens_and_branches() {
        assert_eq!(toks("CC(Cl)Br"), vec!["C", "C", "(", "Cl", ")", "Br"]);
    }

    #[test]
    fn test_tokenizes_rings_and_aromatics() {
        let t = toks("c1ccccc1O");
        assert_eq!(t.len(), 9);
        assert_eq!(t[1], RING_TOKEN);
        assert_eq!(t[7], RING_TOKEN);
        assert_eq!(t[8], "O");
    }

    #[test]
    fn test_bracket_atoms_are_single_tokens() {
        assert_eq!(toks("[NH4+].[Cl-]"), vec!["[NH4+]", ".", "[Cl-]"]);
        assert_eq!(toks("C[C@@H](O)F").len(), 6);
    }

    #[test]
    fn test_percent_ring_labels() {
        let t = toks("C%10CCCC%10");
        assert_eq!(t.iter().filter(|s| s.as_str() == RING_TOKEN).count(), 2);
    }

    #[test]
    fn test_rejects_malformed_strings() {
        for bad in ["", "C(C", "CC)", "C1CC", "C[NH", "C[]C", "C[C[N]", "[[N]]", "C?C", "C C", "C%1"] {
            let err = tokenize(bad).unwrap_err();
            assert!(
                matches!(err, PipelineError::Featurization { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_fingerprint_shape_and_determinism() {
        let f = Featurizer::new(64);
        let a = f.featurize("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let b = f.featurize("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        assert!(a.iter().any(|&v| v > 0.0));
        assert!(a.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_different_molecules_differ() {
        let f = Featurizer::new(256);
        assert_ne!(f.featurize("CCO").unwrap(), f.featurize("c1ccncc1").unwrap());
    }

    #[test]
    fn test_featurize_all_matches_rows() {
        let f = Featurizer::new(32);
        let inputs = vec!["CCO".to_string(), "CCN".to_string()];
        let m = f.featurize_all(&inputs).unwrap();
        assert_eq!(m.len(), 64);
        assert_eq!(&m[..32], f.featurize("CCO").unwrap().as_slice());
        assert_eq!(&m[32..], f.featurize("CCN").unwrap().as_slice());
    }

    #[test]
    fn test_featurize_all_reports_bad_input() {
        let f = Featurizer::new(32);
        let inputs = vec!["CCO".to_string(), "C(".to_string()];
        match f.featurize_all(&inputs).unwrap_err() {
            PipelineError::Featurization { smiles, .. } => assert_eq!(smiles, "C("),
            other => panic!("unexpected {other:?}"),
        }
    }
}
