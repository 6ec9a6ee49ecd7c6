//! Text vectorization: cleaned documents to sparse feature matrices.
//!
//! Two interchangeable strategies share one n-gram analyzer and vocabulary
//! builder:
//!
//! - [`count::CountVectorizer`] - raw n-gram counts
//! - [`tfidf::TfidfVectorizer`] - IDF-weighted, L2-normalized counts
//!
//! Strategies are selected by [`VectorizerKind`], which parses the selector
//! strings used on the command line and in `config.toml`.

pub mod count;
pub mod ngram;
pub mod sparse;
pub mod tfidf;

use crate::error::{PipelineError, Result};
use serde::Deserialize;
use sparse::SparseMatrix;
use std::fmt;
use std::str::FromStr;

pub use count::CountVectorizer;
pub use tfidf::TfidfVectorizer;

/// A fit-on-train, apply-to-test text vectorizer.
pub trait Vectorizer {
    /// Learn the vocabulary (and weights) from `documents` and return their matrix.
    fn fit_transform(&mut self, documents: &[String]) -> Result<SparseMatrix>;

    /// Vectorize unseen documents with the fitted vocabulary.
    fn transform(&self, documents: &[String]) -> Result<SparseMatrix>;

    /// Width of the produced matrices; zero until fitted.
    fn n_features(&self) -> usize;

    fn name(&self) -> &'static str;
}

/// Document-frequency bound for vocabulary pruning.
///
/// Deserializes from TOML integers as [`DfBound::Count`] and from floats as
/// [`DfBound::Proportion`], so `max_df = 1` and `max_df = 1.0` differ.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DfBound {
    /// Absolute number of documents
    Count(usize),
    /// Fraction of the training documents, in `[0, 1]`
    Proportion(f64),
}

impl DfBound {
    /// The bound expressed as a number of documents out of `n_docs`.
    pub fn threshold(self, n_docs: usize) -> Result<f64> {
        match self {
            DfBound::Count(c) => Ok(c as f64),
            DfBound::Proportion(p) if (0.0..=1.0).contains(&p) => Ok(p * n_docs as f64),
            DfBound::Proportion(p) => Err(PipelineError::InvalidParameter(format!(
                "document-frequency proportion must be in [0, 1], got {}",
                p
            ))),
        }
    }
}

/// Analyzer and vocabulary settings shared by both vectorizers.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerParams {
    /// Inclusive `(min_n, max_n)` word n-gram range
    pub ngram_range: (usize, usize),
    pub min_df: DfBound,
    pub max_df: DfBound,
    /// Keep only this many most frequent n-grams
    pub max_features: Option<usize>,
}

impl Default for VectorizerParams {
    /// 1- to 3-grams, every term kept.
    fn default() -> Self {
        VectorizerParams {
            ngram_range: (1, 3),
            min_df: DfBound::Count(0),
            max_df: DfBound::Proportion(1.0),
            max_features: None,
        }
    }
}

/// The closed set of vectorization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorizerKind {
    Tfidf,
    Count,
}

impl VectorizerKind {
    pub const ALL: [VectorizerKind; 2] = [VectorizerKind::Tfidf, VectorizerKind::Count];

    /// Selector string accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            VectorizerKind::Tfidf => "tfidf",
            VectorizerKind::Count => "count",
        }
    }

    /// Construct an unfitted vectorizer of this kind.
    pub fn build(self, params: VectorizerParams) -> Box<dyn Vectorizer> {
        match self {
            VectorizerKind::Tfidf => Box::new(TfidfVectorizer::new(params)),
            VectorizerKind::Count => Box::new(CountVectorizer::new(params)),
        }
    }
}

impl FromStr for VectorizerKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(VectorizerKind::Tfidf),
            "count" | "counts" => Ok(VectorizerKind::Count),
            _ => Err(PipelineError::UnsupportedVectorizer(s.to_string())),
        }
    }
}

impl fmt::Display for VectorizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("tfidf".parse::<VectorizerKind>().unwrap(), VectorizerKind::Tfidf);
        assert_eq!(" Count ".parse::<VectorizerKind>().unwrap(), VectorizerKind::Count);
        assert!(matches!(
            "word2vec".parse::<VectorizerKind>(),
            Err(PipelineError::UnsupportedVectorizer(_))
        ));
        for kind in VectorizerKind::ALL {
            assert_eq!(kind.as_str().parse::<VectorizerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_build_names() {
        assert_eq!(VectorizerKind::Tfidf.build(VectorizerParams::default()).name(), "tfidf");
        assert_eq!(VectorizerKind::Count.build(VectorizerParams::default()).name(), "count");
    }

    #[test]
    fn test_df_bound_thresholds() {
        assert_eq!(DfBound::Count(1).threshold(100).unwrap(), 1.0);
        assert_eq!(DfBound::Proportion(0.5).threshold(10).unwrap(), 5.0);
        assert!(DfBound::Proportion(1.5).threshold(10).is_err());
    }

    #[derive(Deserialize)]
    struct Bounds {
        a: DfBound,
        b: DfBound,
    }

    #[test]
    fn test_df_bound_from_toml() {
        let bounds: Bounds = toml::from_str("a = 1\nb = 1.0").unwrap();
        assert_eq!(bounds.a, DfBound::Count(1));
        assert_eq!(bounds.b, DfBound::Proportion(1.0));
    }
}
