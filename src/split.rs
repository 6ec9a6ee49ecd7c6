//! Stratified train/test partitioning.

use crate::data::{Corpus, Label};
use crate::error::{PipelineError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// One side of a train/test partition.
#[derive(Debug, Clone, Default)]
pub struct Split {
    /// Positions of the selected documents in the source corpus
    pub indices: Vec<usize>,
    pub texts: Vec<String>,
    pub labels: Vec<Label>,
}

impl Split {
    fn from_indices(corpus: &Corpus, indices: Vec<usize>) -> Self {
        let docs = corpus.documents();
        Split {
            texts: indices.iter().map(|&i| docs[i].text.clone()).collect(),
            labels: indices.iter().map(|&i| docs[i].label).collect(),
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of documents per label, indexed by [`Label::index`].
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for label in &self.labels {
            counts[label.index()] += 1;
        }
        counts
    }
}

/// Stratified splitter: every class keeps its share on both sides.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedSplitter {
    pub train_fraction: f64,
    pub seed: u64,
}

impl StratifiedSplitter {
    pub fn new(train_fraction: f64, seed: u64) -> Self {
        StratifiedSplitter {
            train_fraction,
            seed,
        }
    }

    /// Partition `corpus` into `(train, test)`.
    pub fn split(&self, corpus: &Corpus) -> Result<(Split, Split)> {
        stratified_split(corpus, self.train_fraction, self.seed)
    }
}

impl Default for StratifiedSplitter {
    fn default() -> Self {
        StratifiedSplitter::new(0.8, 42)
    }
}

/// Partition `corpus` into `(train, test)` preserving class proportions.
///
/// The test side receives `ceil((1 - train_fraction) * n)` documents, shared out
/// among the classes in proportion to their size. The two sides are disjoint and
/// together cover every document.
pub fn stratified_split(corpus: &Corpus, train_fraction: f64, seed: u64) -> Result<(Split, Split)> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(PipelineError::DegenerateSplit(format!(
            "train fraction must be in (0, 1), got {}",
            train_fraction
        )));
    }

    let n = corpus.len();
    let counts = corpus.class_counts();
    let present: Vec<Label> = Label::ALL
        .into_iter()
        .filter(|l| counts[l.index()] > 0)
        .collect();

    if present.len() < 2 {
        return Err(PipelineError::DegenerateSplit(format!(
            "need documents of both classes, got {} fake and {} genuine",
            counts[0], counts[1]
        )));
    }
    if let Some(label) = present.iter().find(|l| counts[l.index()] < 2) {
        return Err(PipelineError::DegenerateSplit(format!(
            "the least populated class ({}) has only 1 member, which is too few; \
             the minimum number of members in any class cannot be less than 2",
            label
        )));
    }

    let n_test = ((1.0 - train_fraction) * n as f64 - 1e-9).ceil().max(0.0) as usize;
    let n_train = n - n_test;
    if n_test < present.len() || n_train < present.len() {
        return Err(PipelineError::DegenerateSplit(format!(
            "{} train and {} test documents cannot hold {} classes",
            n_train,
            n_test,
            present.len()
        )));
    }

    let allocation = allocate_test_counts(&counts, n_test);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for label in Label::ALL {
        let mut members: Vec<usize> = corpus
            .documents()
            .iter()
            .enumerate()
            .filter(|(_, d)| d.label == label)
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let k = allocation[label.index()];
        test.extend_from_slice(&members[..k]);
        train.extend_from_slice(&members[k..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    debug!(
        train = train.len(),
        test = test.len(),
        test_fake = allocation[0],
        test_genuine = allocation[1],
        "stratified split"
    );

    Ok((
        Split::from_indices(corpus, train),
        Split::from_indices(corpus, test),
    ))
}

/// Share `n_test` among classes proportionally: floors first, then one extra
/// each for the largest fractional remainders. Every class keeps at least one
/// training document.
fn allocate_test_counts(counts: &[usize; 2], n_test: usize) -> [usize; 2] {
    let n: usize = counts.iter().sum();
    let expected: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 * n_test as f64 / n as f64)
        .collect();

    let mut allocation = [0usize; 2];
    for (i, e) in expected.iter().enumerate() {
        allocation[i] = (e.floor() as usize).min(counts[i].saturating_sub(1));
    }

    let mut order: Vec<usize> = (0..counts.len()).collect();
    // stable sort keeps label order for equal remainders
    order.sort_by(|&a, &b| {
        let ra = expected[a] - expected[a].floor();
        let rb = expected[b] - expected[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut remaining = n_test - allocation.iter().sum::<usize>();
    while remaining > 0 {
        let mut placed = false;
        for &i in &order {
            if remaining == 0 {
                break;
            }
            if allocation[i] + 1 < counts[i] {
                allocation[i] += 1;
                remaining -= 1;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }
    allocation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Document;
    use std::collections::HashSet;

    fn corpus(fake: usize, genuine: usize) -> Corpus {
        let mut docs = Vec::new();
        for i in 0..genuine {
            docs.push(Document {
                text: format!("genuine {}", i),
                label: Label::Genuine,
            });
        }
        for i in 0..fake {
            docs.push(Document {
                text: format!("fake {}", i),
                label: Label::Fake,
            });
        }
        Corpus::from_documents(docs)
    }

    #[test]
    fn test_split_sizes_and_coverage() {
        let corpus = corpus(40, 60);
        let (train, test) = stratified_split(&corpus, 0.8, 1).unwrap();
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
        assert_eq!(test.class_counts(), [8, 12]);
        assert_eq!(train.class_counts(), [32, 48]);

        let train_set: HashSet<usize> = train.indices.iter().copied().collect();
        let test_set: HashSet<usize> = test.indices.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));
        assert_eq!(train_set.len() + test_set.len(), corpus.len());
    }

    #[test]
    fn test_texts_follow_labels() {
        let corpus = corpus(10, 10);
        let (train, test) = stratified_split(&corpus, 0.8, 3).unwrap();
        for split in [&train, &test] {
            for (text, label) in split.texts.iter().zip(&split.labels) {
                assert_eq!(text.starts_with("genuine"), *label == Label::Genuine);
            }
        }
    }

    #[test]
    fn test_uneven_classes_round_by_remainder() {
        // 7 fake, 13 genuine, 4 test docs: expected 1.4 / 2.6
        let corpus = corpus(7, 13);
        let (_, test) = stratified_split(&corpus, 0.8, 0).unwrap();
        assert_eq!(test.class_counts(), [1, 3]);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let corpus = corpus(25, 25);
        let (a, _) = stratified_split(&corpus, 0.8, 9).unwrap();
        let (b, _) = stratified_split(&corpus, 0.8, 9).unwrap();
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_single_member_class_is_degenerate() {
        let err = stratified_split(&corpus(1, 10), 0.8, 0).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateSplit(_)));
    }

    #[test]
    fn test_single_class_is_degenerate() {
        let err = stratified_split(&corpus(0, 10), 0.8, 0).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateSplit(_)));
    }

    #[test]
    fn test_too_small_test_side_is_degenerate() {
        // 4 documents at 0.8 leave a single test document for two classes
        let err = stratified_split(&corpus(2, 2), 0.8, 0).unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateSplit(_)));
    }

    #[test]
    fn test_bad_fraction() {
        assert!(stratified_split(&corpus(5, 5), 1.0, 0).is_err());
        assert!(stratified_split(&corpus(5, 5), 0.0, 0).is_err());
        assert!(stratified_split(&corpus(5, 5), f64::NAN, 0).is_err());
    }
}
