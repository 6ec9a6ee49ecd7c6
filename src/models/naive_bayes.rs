//! Multinomial Naive Bayes for count and TF-IDF features.

use super::{check_training_data, check_width, Classifier};
use crate::data::Label;
use crate::error::{PipelineError, Result};
use crate::features::sparse::SparseMatrix;
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

/// Multinomial Naive Bayes with additive (Laplace/Lidstone) smoothing.
///
/// Class priors are the empirical class frequencies. Per-class feature
/// log-probabilities are `ln(count + alpha) - ln(total + alpha * n_features)`.
#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    /// `ln P(class)`, indexed by [`Label::index`]
    class_log_prior: Array1<f64>,
    /// `ln P(feature | class)`, shape `(2, n_features)`
    feature_log_prob: Array2<f64>,
    fitted: bool,
}

impl MultinomialNaiveBayes {
    pub fn new(alpha: f64) -> Self {
        MultinomialNaiveBayes {
            alpha,
            class_log_prior: Array1::zeros(2),
            feature_log_prob: Array2::zeros((2, 0)),
            fitted: false,
        }
    }

    pub fn class_log_prior(&self) -> &Array1<f64> {
        &self.class_log_prior
    }

    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }

    /// Joint log-likelihood of `row` under each class.
    fn joint_log_likelihood(&self, features: &SparseMatrix, i: usize) -> [f64; 2] {
        let row = features.row(i);
        let mut scores = [0.0; 2];
        for label in Label::ALL {
            let k = label.index();
            let log_prob = self.feature_log_prob.row(k);
            scores[k] = self.class_log_prior[k]
                + row.iter().map(|(c, v)| v * log_prob[c]).sum::<f64>();
        }
        scores
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn fit(&mut self, features: &SparseMatrix, labels: &[Label]) -> Result<()> {
        check_training_data(features, labels)?;
        if self.alpha.is_nan() || self.alpha <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "naive bayes alpha must be positive, got {}",
                self.alpha
            )));
        }

        let n_features = features.n_cols();
        let mut feature_count = Array2::<f64>::zeros((2, n_features));
        let mut class_count = [0usize; 2];
        for (row, label) in features.rows().zip(labels) {
            let k = label.index();
            class_count[k] += 1;
            for (c, v) in row.iter() {
                if v < 0.0 {
                    return Err(PipelineError::InvalidParameter(
                        "naive bayes requires non-negative feature values".to_string(),
                    ));
                }
                feature_count[[k, c]] += v;
            }
        }

        let smoothed = feature_count + self.alpha;
        let totals = smoothed.sum_axis(Axis(1));
        let mut log_prob = smoothed.mapv(f64::ln);
        for (k, total) in totals.iter().enumerate() {
            let log_total = total.ln();
            log_prob.row_mut(k).mapv_inplace(|v| v - log_total);
        }

        let n = labels.len() as f64;
        self.class_log_prior = Array1::from_iter(class_count.iter().map(|&c| (c as f64 / n).ln()));
        self.feature_log_prob = log_prob;
        self.fitted = true;

        debug!(
            features = n_features,
            fake = class_count[0],
            genuine = class_count[1],
            "fitted naive bayes"
        );
        Ok(())
    }

    fn predict(&self, features: &SparseMatrix) -> Result<Vec<Label>> {
        if !self.fitted {
            return Err(PipelineError::NotFitted("naive bayes"));
        }
        check_width(features, self.feature_log_prob.ncols())?;

        Ok((0..features.n_rows())
            .map(|i| {
                let [fake, genuine] = self.joint_log_likelihood(features, i);
                if genuine > fake {
                    Label::Genuine
                } else {
                    Label::Fake
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::separable;

    #[test]
    fn test_probabilities_are_normalized() {
        let (x, y) = separable();
        let mut model = MultinomialNaiveBayes::new(1.0);
        model.fit(&x, &y).unwrap();

        let prior: f64 = model.class_log_prior().iter().map(|p| p.exp()).sum();
        assert!((prior - 1.0).abs() < 1e-12);
        for row in model.feature_log_prob().rows() {
            let total: f64 = row.iter().map(|p| p.exp()).sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smoothed_estimates() {
        // fake: one document "a"; genuine: one document "b b"
        let x = SparseMatrix::from_rows(vec![vec![(0, 1.0)], vec![(1, 2.0)]], 2);
        let mut model = MultinomialNaiveBayes::new(1.0);
        model.fit(&x, &[Label::Fake, Label::Genuine]).unwrap();

        let lp = model.feature_log_prob();
        assert!((lp[[0, 0]] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert!((lp[[1, 1]] - (3.0f64 / 4.0).ln()).abs() < 1e-12);
        assert!((model.class_log_prior()[0] - 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_row_follows_prior() {
        let x = SparseMatrix::from_rows(
            vec![vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]],
            2,
        );
        let mut model = MultinomialNaiveBayes::new(1.0);
        model
            .fit(&x, &[Label::Genuine, Label::Genuine, Label::Fake])
            .unwrap();
        let empty = SparseMatrix::from_rows(vec![vec![]], 2);
        assert_eq!(model.predict(&empty).unwrap(), vec![Label::Genuine]);
    }

    #[test]
    fn test_rejects_bad_alpha_and_negative_values() {
        let (x, y) = separable();
        let mut model = MultinomialNaiveBayes::new(0.0);
        assert!(matches!(
            model.fit(&x, &y),
            Err(PipelineError::InvalidParameter(_))
        ));

        let negative = SparseMatrix::from_rows(vec![vec![(0, -1.0)], vec![(1, 1.0)]], 2);
        let mut model = MultinomialNaiveBayes::new(1.0);
        assert!(matches!(
            model.fit(&negative, &[Label::Fake, Label::Genuine]),
            Err(PipelineError::InvalidParameter(_))
        ));
    }
}
