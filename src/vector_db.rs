use ndarray::{Array1, ArrayViewMut1};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

use crate::utils::Tokenizer;

/// Non-zero `(column, weight)` pairs of one row, sorted by column.
type SparseRow = Vec<(usize, f32)>;

/// TF-IDF rows over a fixed set of texts. Row `i` belongs to text `i`;
/// each row is L2-normalized, so cosine similarity is a plain dot product.
///
/// The vocabulary is frozen at build time. Terms seen only in queries are
/// dropped.
#[derive(Debug, Clone)]
pub struct TermIndex {
    tokenizer: Tokenizer,
    vocabulary: FxHashMap<String, usize>,
    idf: Array1<f32>,
    rows: Vec<SparseRow>,
}

impl TermIndex {
    pub fn build<S: AsRef<str>>(texts: &[S], tokenizer: Tokenizer) -> Self {
        let docs: Vec<Vec<String>> = texts
            .iter()
            .map(|text| tokenizer.tokenize(text.as_ref()))
            .collect();

        // Sorted so column positions don't depend on hashing
        let terms: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
        let vocabulary: FxHashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();

        let counts: Vec<SparseRow> = docs
            .iter()
            .map(|tokens| term_counts(&vocabulary, tokens))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for row in &counts {
            for &(col, _) in row {
                doc_freq[col] += 1;
            }
        }

        let n = docs.len() as f32;
        let idf: Array1<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|mut row| {
                for (col, w) in row.iter_mut() {
                    *w *= idf[*col];
                }
                normalize_sparse(&mut row);
                row
            })
            .collect();

        TermIndex {
            tokenizer,
            vocabulary,
            idf,
            rows,
        }
    }

    /// Vectorizes `text` against the frozen vocabulary. Returns the zero
    /// vector when no term of `text` is known.
    pub fn vectorize(&self, text: &str) -> Array1<f32> {
        let mut vector = Array1::<f32>::zeros(self.vocabulary.len());
        for token in self.tokenizer.tokenize(text) {
            if let Some(&col) = self.vocabulary.get(&token) {
                vector[col] += 1.0;
            }
        }
        vector *= &self.idf;
        l2_normalize(vector.view_mut());
        vector
    }

    /// Cosine similarity of `text` against every row, in row order.
    pub fn similarities(&self, text: &str) -> Array1<f32> {
        let query = self.vectorize(text);
        self.rows
            .iter()
            .map(|row| row.iter().map(|&(col, w)| w * query[col]).sum::<f32>())
            .collect()
    }

    /// Row with the highest similarity and its score. Ties go to the lowest
    /// row. `None` only when the index has no rows.
    pub fn best_match(&self, text: &str) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in self.similarities(text).iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&col| self.idf[col])
    }
}

fn term_counts(vocabulary: &FxHashMap<String, usize>, tokens: &[String]) -> SparseRow {
    let mut counts: FxHashMap<usize, f32> = FxHashMap::default();
    for token in tokens {
        *counts.entry(vocabulary[token.as_str()]).or_insert(0.0) += 1.0;
    }
    let mut row: SparseRow = counts.into_iter().collect();
    row.sort_unstable_by_key(|&(col, _)| col);
    row
}

fn normalize_sparse(row: &mut SparseRow) {
    let norm = row.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
}

fn l2_normalize(mut v: ArrayViewMut1<f32>) {
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v.mapv_inplace(|x| x / norm);
    }
}
