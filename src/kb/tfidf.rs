//! TF-IDF vectorization over word n-grams.
//!
//! Documents are lowercased, split into tokens of two or more word
//! characters, stripped of English stopwords and expanded into 1..=3-grams.
//! Weights use smoothed idf (`ln((1 + n) / (1 + df)) + 1`) and every vector
//! is L2-normalized, so the dot product of two vectors is their cosine
//! similarity.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::stopwords::ENGLISH_STOP_WORDS;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Vectorizer parameters. Column count never exceeds `max_features`.
#[derive(Debug, Clone, Copy)]
pub struct VectorizerParams {
    pub min_ngram: usize,
    pub max_ngram: usize,
    pub max_features: usize,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            min_ngram: 1,
            max_ngram: 3,
            max_features: 1000,
        }
    }
}

/// Sparse vector as `(column, weight)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(col, _)| *col);
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product via a merge over both sorted column lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Lowercase, tokenize, drop stopwords and build the n-gram terms of `text`.
pub fn analyze(text: &str, params: &VectorizerParams) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !ENGLISH_STOP_WORDS.contains(t))
        .collect();

    let mut terms = Vec::new();
    for n in params.min_ngram.max(1)..=params.max_ngram {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

fn term_counts(terms: Vec<String>) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Fitted vocabulary plus idf weights.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary from `docs` and return the fitted vectorizer
    /// together with one normalized row per document, in input order.
    pub fn fit_transform(params: VectorizerParams, docs: &[String]) -> (Self, Vec<SparseVector>) {
        let doc_counts: Vec<HashMap<String, u64>> = docs
            .iter()
            .map(|doc| term_counts(analyze(doc, &params)))
            .collect();

        let mut corpus_tf: HashMap<&str, u64> = HashMap::new();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                *corpus_tf.entry(term.as_str()).or_insert(0) += count;
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms, then order columns alphabetically.
        let mut ranked: Vec<(&str, u64)> = corpus_tf.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(params.max_features);
        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = docs.len() as f64;
        let idf = kept
            .iter()
            .map(|term| {
                let doc_freq = df.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect();
        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();

        let vectorizer = Self {
            params,
            vocabulary,
            idf,
        };
        let rows = doc_counts
            .iter()
            .map(|counts| vectorizer.weigh(counts))
            .collect();
        (vectorizer, rows)
    }

    /// Vectorize unseen text against the fitted vocabulary. Terms outside the
    /// vocabulary are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&term_counts(analyze(text, &self.params)))
    }

    fn weigh(&self, counts: &HashMap<String, u64>) -> SparseVector {
        let weights = counts
            .iter()
            .filter_map(|(term, count)| {
                self.vocabulary
                    .get(term)
                    .map(|&col| (col, *count as f64 * self.idf[col]))
            })
            .collect();
        SparseVector::from_weights(weights)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// The fitted vectorizer and the document matrix; row `i` is document `i`.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
}

impl VectorIndex {
    pub fn build(params: VectorizerParams, docs: &[String]) -> Self {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(params, docs);
        Self { vectorizer, rows }
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let q = self.vectorizer.transform(query);
        if q.is_empty() {
            return vec![0.0; self.rows.len()];
        }
        self.rows.iter().map(|row| row.dot(&q)).collect()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }
}
