//! Evaluation metrics: accuracy, confusion matrix and the classification report.

use crate::data::Label;
use crate::error::{PipelineError, Result};
use std::fmt;

fn check_lengths(truth: &[Label], predicted: &[Label]) -> Result<()> {
    if truth.len() != predicted.len() {
        return Err(PipelineError::ShapeMismatch(format!(
            "{} true labels but {} predictions",
            truth.len(),
            predicted.len()
        )));
    }
    if truth.is_empty() {
        return Err(PipelineError::InvalidLabels(
            "cannot evaluate an empty prediction set".to_string(),
        ));
    }
    Ok(())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Fraction of predictions equal to the truth.
pub fn accuracy(truth: &[Label], predicted: &[Label]) -> Result<f64> {
    check_lengths(truth, predicted)?;
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(ratio(correct, truth.len()))
}

/// Counts of (true, predicted) pairs, indexed by [`Label::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn new(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        check_lengths(truth, predicted)?;
        let mut counts = [[0usize; 2]; 2];
        for (t, p) in truth.iter().zip(predicted) {
            counts[t.index()][p.index()] += 1;
        }
        Ok(ConfusionMatrix { counts })
    }

    /// Documents of class `truth` predicted as `predicted`.
    pub fn count(&self, truth: Label, predicted: Label) -> usize {
        self.counts[truth.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    fn true_positives(&self, label: Label) -> usize {
        self.count(label, label)
    }

    /// Documents predicted as `label`.
    fn predicted(&self, label: Label) -> usize {
        Label::ALL.iter().map(|&t| self.count(t, label)).sum()
    }

    /// Documents truly of class `label`.
    fn support(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9}",
            "true\\pred",
            Label::Fake.index(),
            Label::Genuine.index()
        )?;
        for truth in Label::ALL {
            writeln!(
                f,
                "{:>12} {:>9} {:>9}",
                truth.index(),
                self.count(truth, Label::Fake),
                self.count(truth, Label::Genuine)
            )?;
        }
        Ok(())
    }
}

/// Precision, recall, F1 and support for one class (or an average).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(true_positives: usize, predicted: usize, support: usize) -> Self {
        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassMetrics {
            precision,
            recall,
            f1,
            support,
        }
    }
}

/// Per-class and averaged metrics for a binary prediction set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// Indexed by [`Label::index`]
    pub classes: [ClassMetrics; 2],
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn new(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        let confusion = ConfusionMatrix::new(truth, predicted)?;
        Ok(Self::from_confusion(&confusion))
    }

    pub fn from_confusion(confusion: &ConfusionMatrix) -> Self {
        let classes = Label::ALL.map(|label| {
            ClassMetrics::from_counts(
                confusion.true_positives(label),
                confusion.predicted(label),
                confusion.support(label),
            )
        });
        let total = confusion.total();
        let correct: usize = Label::ALL.iter().map(|&l| confusion.true_positives(l)).sum();

        let mean = |metric: fn(&ClassMetrics) -> f64| -> f64 {
            classes.iter().map(metric).sum::<f64>() / classes.len() as f64
        };
        let weighted = |metric: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / total as f64
        };

        ClassificationReport {
            classes,
            accuracy: ratio(correct, total),
            macro_avg: ClassMetrics {
                precision: mean(|c| c.precision),
                recall: mean(|c| c.recall),
                f1: mean(|c| c.f1),
                support: total,
            },
            weighted_avg: ClassMetrics {
                precision: weighted(|c| c.precision),
                recall: weighted(|c| c.recall),
                f1: weighted(|c| c.f1),
                support: total,
            },
        }
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.classes[label.index()]
    }
}

const NAME_WIDTH: usize = 12;

fn write_metrics_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>w$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name,
        m.precision,
        m.recall,
        m.f1,
        m.support,
        w = NAME_WIDTH
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9} {:>9}",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            w = NAME_WIDTH
        )?;
        writeln!(f)?;
        for label in Label::ALL {
            write_metrics_row(f, &label.to_string(), self.class(label))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>w$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support,
            w = NAME_WIDTH
        )?;
        write_metrics_row(f, "macro avg", &self.macro_avg)?;
        write_metrics_row(f, "weighted avg", &self.weighted_avg)
    }
}
