//! Binary classifiers over sparse document-term matrices.
//!
//! Four interchangeable strategies implement [`Classifier`]:
//!
//! | Selector | Model |
//! |----------|-------|
//! | `naive_bayes` | Multinomial Naive Bayes |
//! | `logistic_regression` | L2-regularized logistic regression |
//! | `passive_aggressive` | PA-I online linear classifier |
//! | `decision_tree` | CART with Gini impurity |
//!
//! Every model goes through the same lifecycle: constructed unfitted by
//! [`ModelKind::build`], fitted once on the training matrix, then used for
//! prediction. Predicting before fitting is an error.

pub mod decision_tree;
pub mod logistic;
pub mod naive_bayes;
pub mod passive_aggressive;

use crate::data::Label;
use crate::error::{PipelineError, Result};
use crate::features::sparse::SparseMatrix;
use std::fmt;
use std::str::FromStr;

pub use decision_tree::DecisionTreeClassifier;
pub use logistic::LogisticRegression;
pub use naive_bayes::MultinomialNaiveBayes;
pub use passive_aggressive::PassiveAggressiveClassifier;

/// A binary text classifier.
pub trait Classifier {
    /// Learn parameters from a training matrix and its labels.
    fn fit(&mut self, features: &SparseMatrix, labels: &[Label]) -> Result<()>;

    /// Predict a label for every row.
    fn predict(&self, features: &SparseMatrix) -> Result<Vec<Label>>;

    fn name(&self) -> &'static str;
}

/// Hyperparameters for every model kind; each model reads the fields it uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Additive smoothing for Naive Bayes
    pub alpha: f64,
    /// Inverse regularization strength (logistic) / aggressiveness cap (PA)
    pub c: f64,
    /// Gradient iterations for logistic regression
    pub lr_max_iter: usize,
    /// Gradient infinity-norm at which logistic regression stops
    pub lr_tol: f64,
    /// Epochs for the passive-aggressive classifier
    pub pa_max_iter: usize,
    /// Minimum per-sample loss improvement between epochs
    pub pa_tol: f64,
    /// Epochs without improvement before PA stops
    pub n_iter_no_change: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Seed for the passive-aggressive sample order
    pub seed: u64,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            alpha: 1.0,
            c: 1.0,
            lr_max_iter: 100,
            lr_tol: 1e-4,
            pa_max_iter: 1000,
            pa_tol: 1e-3,
            n_iter_no_change: 5,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

type Constructor = fn(&ModelParams) -> Box<dyn Classifier>;

fn naive_bayes(params: &ModelParams) -> Box<dyn Classifier> {
    Box::new(MultinomialNaiveBayes::new(params.alpha))
}

fn logistic_regression(params: &ModelParams) -> Box<dyn Classifier> {
    Box::new(LogisticRegression::new(params.c, params.lr_max_iter, params.lr_tol))
}

fn passive_aggressive(params: &ModelParams) -> Box<dyn Classifier> {
    Box::new(PassiveAggressiveClassifier::new(
        params.c,
        params.pa_max_iter,
        params.pa_tol,
        params.n_iter_no_change,
        params.seed,
    ))
}

fn decision_tree(params: &ModelParams) -> Box<dyn Classifier> {
    Box::new(DecisionTreeClassifier::new(
        params.max_depth,
        params.min_samples_split,
        params.min_samples_leaf,
    ))
}

/// The closed set of model strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    NaiveBayes,
    LogisticRegression,
    PassiveAggressive,
    DecisionTree,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::NaiveBayes,
        ModelKind::LogisticRegression,
        ModelKind::PassiveAggressive,
        ModelKind::DecisionTree,
    ];

    /// Selector string accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::NaiveBayes => "naive_bayes",
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::PassiveAggressive => "passive_aggressive",
            ModelKind::DecisionTree => "decision_tree",
        }
    }

    fn constructor(self) -> Constructor {
        match self {
            ModelKind::NaiveBayes => naive_bayes,
            ModelKind::LogisticRegression => logistic_regression,
            ModelKind::PassiveAggressive => passive_aggressive,
            ModelKind::DecisionTree => decision_tree,
        }
    }

    /// Construct an unfitted model of this kind.
    pub fn build(self, params: &ModelParams) -> Box<dyn Classifier> {
        (self.constructor())(params)
    }
}

impl FromStr for ModelKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "naive_bayes" | "nb" => Ok(ModelKind::NaiveBayes),
            "logistic_regression" | "logistic" | "lr" => Ok(ModelKind::LogisticRegression),
            "passive_aggressive" | "pa" | "pac" => Ok(ModelKind::PassiveAggressive),
            "decision_tree" | "tree" | "dt" => Ok(ModelKind::DecisionTree),
            _ => Err(PipelineError::UnsupportedModel(s.to_string())),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared input checks for `fit`.
pub(crate) fn check_training_data(features: &SparseMatrix, labels: &[Label]) -> Result<()> {
    if features.n_rows() != labels.len() {
        return Err(PipelineError::ShapeMismatch(format!(
            "{} feature rows but {} labels",
            features.n_rows(),
            labels.len()
        )));
    }
    if labels.is_empty() {
        return Err(PipelineError::InvalidLabels("no training samples".to_string()));
    }
    let first = labels[0];
    if labels.iter().all(|&l| l == first) {
        return Err(PipelineError::InvalidLabels(format!(
            "training labels contain only class {}",
            first
        )));
    }
    Ok(())
}

/// Shared width check for `predict`.
pub(crate) fn check_width(features: &SparseMatrix, fitted: usize) -> Result<()> {
    if features.n_cols() != fitted {
        return Err(PipelineError::ShapeMismatch(format!(
            "model fitted on {} features, got {}",
            fitted,
            features.n_cols()
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("nb".parse::<ModelKind>().unwrap(), ModelKind::NaiveBayes);
        assert_eq!(
            "Logistic-Regression".parse::<ModelKind>().unwrap(),
            ModelKind::LogisticRegression
        );
        assert!(matches!(
            "svm".parse::<ModelKind>(),
            Err(PipelineError::UnsupportedModel(_))
        ));
        for kind in ModelKind::ALL {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_every_kind_separates_easy_data() {
        let (x, y) = separable();
        for kind in ModelKind::ALL {
            let mut model = kind.build(&ModelParams::default());
            model.fit(&x, &y).unwrap();
            assert_eq!(model.predict(&x).unwrap(), y, "{} on training rows", kind);
            assert_eq!(
                model.predict(&probes()).unwrap(),
                vec![Label::Genuine, Label::Fake],
                "{} on probes",
                kind
            );
        }
    }

    #[test]
    fn test_every_kind_rejects_bad_input() {
        let (x, y) = separable();
        for kind in ModelKind::ALL {
            let mut model = kind.build(&ModelParams::default());
            assert!(matches!(model.predict(&x), Err(PipelineError::NotFitted(_))));
            assert!(matches!(
                model.fit(&x, &y[..3]),
                Err(PipelineError::ShapeMismatch(_))
            ));
            assert!(matches!(
                model.fit(&x, &[Label::Fake; 8]),
                Err(PipelineError::InvalidLabels(_))
            ));

            model.fit(&x, &y).unwrap();
            let narrow = SparseMatrix::from_rows(vec![vec![(0, 1.0)]], 2);
            assert!(matches!(
                model.predict(&narrow),
                Err(PipelineError::ShapeMismatch(_))
            ));
        }
    }
}
