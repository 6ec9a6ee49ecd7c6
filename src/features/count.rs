//! Raw n-gram count vectorizer.

use super::ngram::NgramAnalyzer;
use super::sparse::SparseMatrix;
use super::{Vectorizer, VectorizerParams};
use crate::error::{PipelineError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Counts word n-grams per document.
///
/// Fitting learns the vocabulary: every n-gram seen in training whose document
/// frequency lies within `[min_df, max_df]`, optionally limited to the
/// `max_features` most frequent. Columns follow the alphabetical order of the
/// retained n-grams.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    params: VectorizerParams,
    analyzer: NgramAnalyzer,
    vocabulary: HashMap<String, usize>,
    feature_names: Vec<String>,
}

impl CountVectorizer {
    pub fn new(params: VectorizerParams) -> Self {
        CountVectorizer {
            analyzer: NgramAnalyzer::new(params.ngram_range.0, params.ngram_range.1),
            params,
            vocabulary: HashMap::new(),
            feature_names: Vec::new(),
        }
    }

    /// N-gram to column mapping.
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Column names, in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn is_fitted(&self) -> bool {
        !self.feature_names.is_empty()
    }

    /// Learn the vocabulary and count the training documents.
    ///
    /// Returns the count matrix and the document frequency of each column.
    pub(crate) fn fit_counts(&mut self, documents: &[String]) -> Result<(SparseMatrix, Vec<usize>)> {
        let per_doc: Vec<HashMap<String, usize>> =
            documents.iter().map(|d| self.term_counts(d)).collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut total_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &per_doc {
            for (term, &count) in counts {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                *total_freq.entry(term.as_str()).or_insert(0) += count;
            }
        }

        if doc_freq.is_empty() {
            return Err(PipelineError::EmptyVocabulary(
                "documents contain no tokens of two or more word characters".to_string(),
            ));
        }

        let n_docs = documents.len();
        let min_docs = self.params.min_df.threshold(n_docs)?;
        let max_docs = self.params.max_df.threshold(n_docs)?;
        if max_docs < min_docs {
            return Err(PipelineError::InvalidParameter(format!(
                "max_df ({:?}) corresponds to fewer documents than min_df ({:?})",
                self.params.max_df, self.params.min_df
            )));
        }

        let mut retained: Vec<&str> = doc_freq
            .iter()
            .filter(|(_, &df)| df as f64 >= min_docs && df as f64 <= max_docs)
            .map(|(term, _)| *term)
            .collect();

        if let Some(limit) = self.params.max_features {
            retained.sort_by(|a, b| total_freq[b].cmp(&total_freq[a]).then_with(|| a.cmp(b)));
            retained.truncate(limit);
        }

        if retained.is_empty() {
            return Err(PipelineError::EmptyVocabulary(
                "after pruning, no terms remain; try a lower min_df or a higher max_df".to_string(),
            ));
        }

        retained.sort_unstable();
        let column_df: Vec<usize> = retained.iter().map(|t| doc_freq[t]).collect();
        self.feature_names = retained.iter().map(|t| t.to_string()).collect();
        self.vocabulary = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        debug!(
            seen = doc_freq.len(),
            kept = self.feature_names.len(),
            docs = n_docs,
            "fitted vocabulary"
        );

        let matrix = self.count_matrix(&per_doc);
        Ok((matrix, column_df))
    }

    /// Count matrix of unseen documents against the fitted vocabulary.
    pub(crate) fn counts(&self, documents: &[String]) -> Result<SparseMatrix> {
        if !self.is_fitted() {
            return Err(PipelineError::NotFitted("count vectorizer"));
        }
        let per_doc: Vec<HashMap<String, usize>> =
            documents.iter().map(|d| self.term_counts(d)).collect();
        Ok(self.count_matrix(&per_doc))
    }

    fn term_counts(&self, document: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for gram in self.analyzer.analyze(document) {
            *counts.entry(gram).or_insert(0) += 1;
        }
        counts
    }

    fn count_matrix(&self, per_doc: &[HashMap<String, usize>]) -> SparseMatrix {
        let mut matrix = SparseMatrix::new(self.feature_names.len());
        for counts in per_doc {
            let row = counts
                .iter()
                .filter_map(|(term, &c)| self.vocabulary.get(term).map(|&col| (col, c as f64)))
                .collect();
            matrix.push_row(row);
        }
        matrix
    }
}

impl Vectorizer for CountVectorizer {
    fn fit_transform(&mut self, documents: &[String]) -> Result<SparseMatrix> {
        self.fit_counts(documents).map(|(matrix, _)| matrix)
    }

    fn transform(&self, documents: &[String]) -> Result<SparseMatrix> {
        self.counts(documents)
    }

    fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    fn name(&self) -> &'static str {
        "count"
    }
}
