//! CART decision tree with Gini impurity.

use super::{check_training_data, check_width, Classifier};
use crate::data::Label;
use crate::error::{PipelineError, Result};
use crate::features::sparse::{SparseMatrix, SparseRow};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        counts: [usize; 2],
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Best split found for one node.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(counts: [usize; 2]) -> f64 {
    let n = (counts[0] + counts[1]) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p = counts[0] as f64 / n;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

fn majority(counts: [usize; 2]) -> Label {
    if counts[1] > counts[0] {
        Label::Genuine
    } else {
        Label::Fake
    }
}

/// Binary decision tree grown greedily on Gini impurity.
///
/// At every node each feature that is non-zero in at least one of the node's
/// rows is considered, with thresholds at midpoints between consecutive
/// distinct values (absent entries count as zero). A node is split only when
/// the weighted child impurity is strictly lower than its own; among equal
/// candidates the lowest feature index and threshold win. Rows with
/// `x[feature] <= threshold` go left.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTreeClassifier {
    pub fn new(max_depth: Option<usize>, min_samples_split: usize, min_samples_leaf: usize) -> Self {
        DecisionTreeClassifier {
            max_depth,
            min_samples_split,
            min_samples_leaf,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path; a lone leaf has depth zero.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push((0usize, 0usize));
        }
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Split { left, right, .. } = self.nodes[id] {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        deepest
    }

    fn leaf_for(&self, row: &SparseRow<'_>) -> [usize; 2] {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { counts } => return counts,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row.get(feature) <= threshold { left } else { right };
                }
            }
        }
    }

    /// Best split over `rows`, if any lowers the impurity.
    fn best_split(
        &self,
        features: &SparseMatrix,
        rows: &[usize],
        labels: &[Label],
    ) -> Option<Candidate> {
        let mut totals = [0usize; 2];
        // feature -> (value, label index) of every non-zero entry at this node
        let mut present: BTreeMap<usize, Vec<(f64, usize)>> = BTreeMap::new();
        for &r in rows {
            let k = labels[r].index();
            totals[k] += 1;
            for (c, v) in features.row(r).iter() {
                present.entry(c).or_default().push((v, k));
            }
        }
        let n = rows.len();
        let parent = gini(totals);
        let mut best: Option<Candidate> = None;

        for (feature, mut values) in present {
            let mut zero_counts = totals;
            for &(_, k) in &values {
                zero_counts[k] -= 1;
            }
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut groups: Vec<(f64, [usize; 2])> = Vec::new();
            let mut zero_pending = zero_counts[0] + zero_counts[1] > 0;
            for (v, k) in values {
                if zero_pending && v > 0.0 {
                    groups.push((0.0, zero_counts));
                    zero_pending = false;
                }
                match groups.last_mut() {
                    Some((last, counts)) if *last == v => counts[k] += 1,
                    _ => {
                        let mut counts = [0usize; 2];
                        counts[k] += 1;
                        groups.push((v, counts));
                    }
                }
            }
            if zero_pending {
                groups.push((0.0, zero_counts));
            }
            let mut left = [0usize; 2];
            for pair in groups.windows(2) {
                let (value, counts) = pair[0];
                left[0] += counts[0];
                left[1] += counts[1];
                let n_left = left[0] + left[1];
                let n_right = n - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }
                let right = [totals[0] - left[0], totals[1] - left[1]];
                let impurity = (n_left as f64 * gini(left) + n_right as f64 * gini(right)) / n as f64;
                let improves = impurity < parent - 1e-12;
                let better = best.map_or(true, |b| impurity < b.impurity - 1e-12);
                if improves && better {
                    best = Some(Candidate {
                        feature,
                        threshold: (value + pair[1].0) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, features: &SparseMatrix, labels: &[Label]) -> Result<()> {
        check_training_data(features, labels)?;
        if self.min_samples_leaf == 0 || self.min_samples_split < 2 {
            return Err(PipelineError::InvalidParameter(format!(
                "decision tree needs min_samples_split >= 2 and min_samples_leaf >= 1, got {} and {}",
                self.min_samples_split, self.min_samples_leaf
            )));
        }

        let mut nodes: Vec<Node> = Vec::new();
        // (node id, rows, depth)
        let mut stack: Vec<(usize, Vec<usize>, usize)> = Vec::new();

        nodes.push(Node::Leaf { counts: [0, 0] });
        stack.push((0, (0..labels.len()).collect(), 0));

        while let Some((id, rows, depth)) = stack.pop() {
            let mut counts = [0usize; 2];
            for &r in &rows {
                counts[labels[r].index()] += 1;
            }
            nodes[id] = Node::Leaf { counts };

            let can_deepen = self.max_depth.map_or(true, |max| depth < max);
            if !can_deepen || rows.len() < self.min_samples_split || gini(counts) == 0.0 {
                continue;
            }

            let split = self.best_split(features, &rows, labels);

            if let Some(Candidate {
                feature, threshold, ..
            }) = split
            {
                let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                    .iter()
                    .partition(|&&r| features.row(r).get(feature) <= threshold);
                let left = nodes.len();
                let right = left + 1;
                nodes.push(Node::Leaf { counts: [0, 0] });
                nodes.push(Node::Leaf { counts: [0, 0] });
                nodes[id] = Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
                stack.push((right, right_rows, depth + 1));
                stack.push((left, left_rows, depth + 1));
            }
        }

        self.nodes = nodes;
        self.n_features = features.n_cols();
        debug!(
            nodes = self.nodes.len(),
            depth = self.depth(),
            "fitted decision tree"
        );
        Ok(())
    }

    fn predict(&self, features: &SparseMatrix) -> Result<Vec<Label>> {
        if self.nodes.is_empty() {
            return Err(PipelineError::NotFitted("decision tree"));
        }
        check_width(features, self.n_features)?;
        Ok(features
            .rows()
            .map(|row| majority(self.leaf_for(&row)))
            .collect())
    }

    fn name(&self) -> &'static str {
        "decision_tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::separable;

    #[test]
    fn test_gini() {
        assert_eq!(gini([4, 0]), 0.0);
        assert!((gini([2, 2]) - 0.5).abs() < 1e-12);
        assert_eq!(gini([0, 0]), 0.0);
    }

    #[test]
    fn test_fits_training_rows_exactly() {
        let (x, y) = separable();
        let mut tree = DecisionTreeClassifier::new(None, 2, 1);
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), y);
        // root on feature 0, then feature 1 inside the low branch
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let (x, y) = separable();
        let mut stump = DecisionTreeClassifier::new(Some(1), 2, 1);
        stump.fit(&x, &y).unwrap();
        assert_eq!(stump.depth(), 1);
        assert_eq!(stump.node_count(), 3);

        let mut leaf = DecisionTreeClassifier::new(Some(0), 2, 1);
        leaf.fit(&x, &y).unwrap();
        assert_eq!(leaf.node_count(), 1);
        // 4/4 tie resolves to fake
        assert_eq!(leaf.predict(&x).unwrap(), vec![Label::Fake; 8]);
    }

    #[test]
    fn test_threshold_is_midpoint() {
        let x = SparseMatrix::from_rows(vec![vec![(0, 1.0)], vec![(0, 3.0)]], 1);
        let mut tree = DecisionTreeClassifier::new(None, 2, 1);
        tree.fit(&x, &[Label::Fake, Label::Genuine]).unwrap();
        match tree.nodes[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(feature, 0);
                assert_eq!(threshold, 2.0);
            }
            ref other => panic!("expected a split, got {:?}", other),
        }
    }

    #[test]
    fn test_min_samples_leaf_blocks_small_children() {
        let x = SparseMatrix::from_rows(
            vec![vec![(0, 1.0)], vec![], vec![], vec![]],
            1,
        );
        let labels = [Label::Genuine, Label::Fake, Label::Fake, Label::Fake];
        let mut tree = DecisionTreeClassifier::new(None, 2, 2);
        tree.fit(&x, &labels).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        let (x, y) = separable();
        let mut tree = DecisionTreeClassifier::new(None, 1, 1);
        assert!(matches!(
            tree.fit(&x, &y),
            Err(PipelineError::InvalidParameter(_))
        ));
    }
}
