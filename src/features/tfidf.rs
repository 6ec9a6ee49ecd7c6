//! TF-IDF (Term Frequency-Inverse Document Frequency) vectorizer.
//!
//! Converts cleaned documents into sparse TF-IDF rows:
//! - raw n-gram counts as term frequency
//! - smoothed IDF, `ln((1 + n) / (1 + df)) + 1`
//! - L2 normalization of every row

use super::count::CountVectorizer;
use super::sparse::SparseMatrix;
use super::{Vectorizer, VectorizerParams};
use crate::error::{PipelineError, Result};
use std::collections::HashMap;

/// TF-IDF vectorizer for converting text to weighted n-gram features.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    counter: CountVectorizer,
    /// Inverse document frequency for each feature
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Create a new TF-IDF vectorizer.
    ///
    /// # Arguments
    ///
    /// * `params` - N-gram range and document-frequency bounds
    pub fn new(params: VectorizerParams) -> Self {
        TfidfVectorizer {
            counter: CountVectorizer::new(params),
            idf: Vec::new(),
        }
    }

    /// N-gram to feature index mapping.
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        self.counter.vocabulary()
    }

    pub fn feature_names(&self) -> &[String] {
        self.counter.feature_names()
    }

    fn weigh(&self, mut counts: SparseMatrix) -> SparseMatrix {
        counts.scale_columns(&self.idf);
        for i in 0..counts.n_rows() {
            let norm = counts.row(i).squared_norm().sqrt();
            if norm > 0.0 {
                counts.scale_row(i, 1.0 / norm);
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    /// Fit the vocabulary and IDF weights, then transform the training documents.
    fn fit_transform(&mut self, documents: &[String]) -> Result<SparseMatrix> {
        let (counts, doc_freq) = self.counter.fit_counts(documents)?;

        let n_docs = documents.len() as f64;
        self.idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(self.weigh(counts))
    }

    fn transform(&self, documents: &[String]) -> Result<SparseMatrix> {
        if self.idf.is_empty() {
            return Err(PipelineError::NotFitted("tf-idf vectorizer"));
        }
        let counts = self.counter.counts(documents)?;
        Ok(self.weigh(counts))
    }

    fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}
