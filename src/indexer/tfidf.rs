//! Term-weighted vectors over recipe ingredient text.
//!
//! Weighting follows the usual smoothed scheme: raw term counts times
//! `ln((1 + n) / (1 + df)) + 1`, compared by cosine. The query is treated as
//! one more document of the collection, so each query sees document
//! frequencies computed over the corpus plus itself. Per-document term counts
//! and corpus document frequencies are computed once; only the weights are
//! recomputed per query.

use crate::corpus::Corpus;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Words of two or more characters
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"))
}

/// Lower-cased word tokens of at least two characters
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    /// term -> dimension
    vocabulary: HashMap<String, usize>,
    /// documents containing each dimension
    doc_freq: Vec<usize>,
    /// sparse (dimension, count) per document, ordered by dimension
    documents: Vec<Vec<(usize, f64)>>,
}

impl TfIdfIndex {
    /// Index the space-joined ingredients of every recipe
    pub fn build(corpus: &Corpus) -> Self {
        let documents: Vec<String> = corpus.iter().map(|r| r.ingredient_text()).collect();
        Self::from_documents(&documents)
    }

    pub fn from_documents<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        let mut vectors = Vec::with_capacity(documents.len());

        for doc in documents {
            let mut counts: HashMap<usize, f64> = HashMap::new();
            for token in tokenize(doc.as_ref()) {
                let next = vocabulary.len();
                let dim = *vocabulary.entry(token).or_insert(next);
                if dim == doc_freq.len() {
                    doc_freq.push(0);
                }
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }

            for dim in counts.keys() {
                doc_freq[*dim] += 1;
            }

            let mut sparse: Vec<(usize, f64)> = counts.into_iter().collect();
            sparse.sort_by_key(|(dim, _)| *dim);
            vectors.push(sparse);
        }

        debug!(
            "Built TF-IDF index: {} documents, {} terms",
            vectors.len(),
            vocabulary.len()
        );

        Self {
            vocabulary,
            doc_freq,
            documents: vectors,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of `query` against every document, in document order.
    ///
    /// Zero for every document when the query has no tokens, and for any
    /// document with no tokens.
    pub fn similarities(&self, query: &str) -> Vec<f64> {
        let mut scores = vec![0.0; self.documents.len()];

        let mut query_counts: HashMap<String, f64> = HashMap::new();
        for token in tokenize(query) {
            *query_counts.entry(token).or_insert(0.0) += 1.0;
        }
        if query_counts.is_empty() || self.documents.is_empty() {
            return scores;
        }

        // The query counts as one more document
        let n_docs = (self.documents.len() + 1) as f64;
        let idf = |df: usize| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;

        let mut weights: Vec<f64> = self.doc_freq.iter().map(|&df| idf(df)).collect();

        // dimension -> query weight, for terms the corpus knows
        let mut query_vector: HashMap<usize, f64> = HashMap::new();
        let mut query_norm_sq = 0.0;
        for (term, count) in &query_counts {
            match self.vocabulary.get(term) {
                Some(&dim) => {
                    weights[dim] = idf(self.doc_freq[dim] + 1);
                    let w = count * weights[dim];
                    query_vector.insert(dim, w);
                    query_norm_sq += w * w;
                }
                None => {
                    // Query-only term: shapes the query norm, matches nothing
                    let w = count * idf(1);
                    query_norm_sq += w * w;
                }
            }
        }

        let query_norm = query_norm_sq.sqrt();
        if query_vector.is_empty() || query_norm == 0.0 {
            return scores;
        }

        for (score, doc) in scores.iter_mut().zip(&self.documents) {
            let mut dot = 0.0;
            let mut norm_sq = 0.0;
            for &(dim, count) in doc {
                let w = count * weights[dim];
                norm_sq += w * w;
                if let Some(q) = query_vector.get(&dim) {
                    dot += w * q;
                }
            }

            if dot > 0.0 && norm_sq > 0.0 {
                *score = (dot / (norm_sq.sqrt() * query_norm)).min(1.0);
            }
        }

        scores
    }
}
