//! Passive-aggressive online linear classifier (PA-I, hinge loss).

use super::{check_training_data, check_width, Classifier};
use crate::data::Label;
use crate::error::{PipelineError, Result};
use crate::features::sparse::SparseMatrix;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// PA-I classifier.
///
/// Visits the training rows in a freshly shuffled order every epoch. A row
/// with hinge loss `l = max(0, 1 - y * (w.x + b))` moves the hyperplane by
/// `tau = min(C, l / (||x||^2 + 1))` towards its label; rows already beyond
/// the margin leave it untouched.
///
/// Training stops after `max_iter` epochs, or earlier once the summed epoch
/// loss has failed to drop by at least `tol * n_samples` below the best epoch
/// so far for `n_iter_no_change` consecutive epochs.
#[derive(Debug, Clone)]
pub struct PassiveAggressiveClassifier {
    c: f64,
    max_iter: usize,
    tol: f64,
    n_iter_no_change: usize,
    seed: u64,
    weights: Array1<f64>,
    intercept: f64,
    n_epochs: usize,
    fitted: bool,
}

impl PassiveAggressiveClassifier {
    pub fn new(c: f64, max_iter: usize, tol: f64, n_iter_no_change: usize, seed: u64) -> Self {
        PassiveAggressiveClassifier {
            c,
            max_iter,
            tol,
            n_iter_no_change,
            seed,
            weights: Array1::zeros(0),
            intercept: 0.0,
            n_epochs: 0,
            fitted: false,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Epochs run by the last `fit`.
    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    pub fn decision_function(&self, features: &SparseMatrix) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(PipelineError::NotFitted("passive aggressive classifier"));
        }
        check_width(features, self.weights.len())?;
        Ok(features
            .rows()
            .map(|row| row.dot(&self.weights) + self.intercept)
            .collect())
    }
}

impl Classifier for PassiveAggressiveClassifier {
    fn fit(&mut self, features: &SparseMatrix, labels: &[Label]) -> Result<()> {
        check_training_data(features, labels)?;
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "passive aggressive C must be positive, got {}",
                self.c
            )));
        }
        if self.n_iter_no_change == 0 {
            return Err(PipelineError::InvalidParameter(
                "n_iter_no_change must be at least 1".to_string(),
            ));
        }

        let n_samples = labels.len();
        let squared_norms: Vec<f64> = features.rows().map(|row| row.squared_norm()).collect();
        let mut w = Array1::<f64>::zeros(features.n_cols());
        let mut b = 0.0;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;
        let mut epochs = 0;

        while epochs < self.max_iter {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for &i in &order {
                let row = features.row(i);
                let y = labels[i].sign();
                let loss = (1.0 - y * (row.dot(&w) + b)).max(0.0);
                epoch_loss += loss;
                if loss > 0.0 {
                    let tau = self.c.min(loss / (squared_norms[i] + 1.0)) * y;
                    for (col, v) in row.iter() {
                        w[col] += tau * v;
                    }
                    b += tau;
                }
            }
            epochs += 1;

            if epoch_loss > best_loss - self.tol * n_samples as f64 {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(epoch_loss);
            if no_improvement >= self.n_iter_no_change {
                break;
            }
        }

        debug!(epochs, best_loss, "fitted passive aggressive classifier");

        self.weights = w;
        self.intercept = b;
        self.n_epochs = epochs;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, features: &SparseMatrix) -> Result<Vec<Label>> {
        Ok(self
            .decision_function(features)?
            .into_iter()
            .map(|z| if z > 0.0 { Label::Genuine } else { Label::Fake })
            .collect())
    }

    fn name(&self) -> &'static str {
        "passive_aggressive"
    }
}
