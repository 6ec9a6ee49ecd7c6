//! L2-regularized logistic regression.

use super::{check_training_data, check_width, Classifier};
use crate::data::Label;
use crate::error::{PipelineError, Result};
use crate::features::sparse::SparseMatrix;
use ndarray::Array1;
use tracing::{debug, warn};

/// Binary logistic regression fitted by Nesterov-accelerated gradient descent.
///
/// Minimizes `0.5 * ||w||^2 + C * sum(ln(1 + exp(-y * (w.x + b))))` with
/// `y = ±1` and an unregularized intercept `b`. The step size is `1 / L`
/// where `L` bounds the Lipschitz constant of the gradient, so every run is
/// deterministic for a given training matrix. Momentum restarts whenever
/// it stops decreasing the objective.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iter: usize,
    tol: f64,
    weights: Array1<f64>,
    intercept: f64,
    n_iter: usize,
    fitted: bool,
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize, tol: f64) -> Self {
        LogisticRegression {
            c,
            max_iter,
            tol,
            weights: Array1::zeros(0),
            intercept: 0.0,
            n_iter: 0,
            fitted: false,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Gradient steps taken by the last `fit`.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Signed distance `w.x + b` of every row; positive means genuine.
    pub fn decision_function(&self, features: &SparseMatrix) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(PipelineError::NotFitted("logistic regression"));
        }
        check_width(features, self.weights.len())?;
        Ok(features
            .rows()
            .map(|row| row.dot(&self.weights) + self.intercept)
            .collect())
    }

    /// Objective gradient with respect to `(w, b)`.
    fn gradient(
        &self,
        features: &SparseMatrix,
        signs: &[f64],
        w: &Array1<f64>,
        b: f64,
    ) -> (Array1<f64>, f64) {
        let mut grad_w = w.clone();
        let mut grad_b = 0.0;
        for (row, &y) in features.rows().zip(signs) {
            let z = row.dot(w) + b;
            let coef = -self.c * y * sigmoid(-y * z);
            for (col, v) in row.iter() {
                grad_w[col] += coef * v;
            }
            grad_b += coef;
        }
        (grad_w, grad_b)
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &SparseMatrix, labels: &[Label]) -> Result<()> {
        check_training_data(features, labels)?;
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "logistic regression C must be positive, got {}",
                self.c
            )));
        }

        let signs: Vec<f64> = labels.iter().map(|l| l.sign()).collect();
        let lipschitz = 1.0
            + 0.25
                * self.c
                * features
                    .rows()
                    .map(|row| row.squared_norm() + 1.0)
                    .sum::<f64>();
        let step = 1.0 / lipschitz;

        let n_features = features.n_cols();
        let mut w = Array1::<f64>::zeros(n_features);
        let mut b = 0.0;
        let mut look_w = w.clone();
        let mut look_b = b;
        let mut t = 1.0f64;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iter {
            let (grad_w, grad_b) = self.gradient(features, &signs, &look_w, look_b);
            let grad_max = grad_w
                .iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if grad_max < self.tol {
                w = look_w;
                b = look_b;
                converged = true;
                break;
            }

            let next_w = &look_w - &(grad_w.clone() * step);
            let next_b = look_b - step * grad_b;

            // Restart the momentum once it points uphill.
            let uphill = grad_w.dot(&(&next_w - &w)) + grad_b * (next_b - b) > 0.0;
            if uphill {
                t = 1.0;
            }
            let next_t = (1.0 + (1.0 + 4.0 * t * t).sqrt()) / 2.0;
            let momentum = (t - 1.0) / next_t;

            look_w = &next_w + &((&next_w - &w) * momentum);
            look_b = next_b + (next_b - b) * momentum;
            w = next_w;
            b = next_b;
            t = next_t;
            iterations += 1;
        }

        if !converged {
            warn!(
                max_iter = self.max_iter,
                "logistic regression did not converge; consider raising lr_max_iter"
            );
        }
        debug!(iterations, converged, features = n_features, "fitted logistic regression");

        self.weights = w;
        self.intercept = b;
        self.n_iter = iterations;
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
        "logistic_regression"
    }
}
