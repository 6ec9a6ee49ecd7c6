//! Labeled news corpus: CSV loading, labeling, shuffling and subsampling.

use crate::error::{PipelineError, Result};
use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Binary article label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// Fabricated article (`0`)
    Fake = 0,
    /// Genuine article (`1`)
    Genuine = 1,
}

impl Label {
    /// Both labels, in index order.
    pub const ALL: [Label; 2] = [Label::Fake, Label::Genuine];

    /// Position of the label in per-class arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Label::index`].
    pub fn from_index(index: usize) -> Option<Label> {
        match index {
            0 => Some(Label::Fake),
            1 => Some(Label::Genuine),
            _ => None,
        }
    }

    /// `-1.0` for fake, `+1.0` for genuine, as used by the linear models.
    pub fn sign(self) -> f64 {
        match self {
            Label::Fake => -1.0,
            Label::Genuine => 1.0,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// One row of an input CSV. Only `text` is required; `title`, `subject` and
/// `date` are accepted and ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct NewsRecord {
    /// Full article body
    pub text: String,
}

/// A raw article together with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Article body, raw or cleaned depending on the stage
    pub text: String,
    /// Ground-truth class
    pub label: Label,
}

/// An ordered collection of labeled documents.
///
/// Built once by [`assemble`] or [`Corpus::from_documents`]; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Wrap already-labeled documents, keeping their order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Corpus { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document texts, in corpus order.
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }

    /// Labels, in corpus order.
    pub fn labels(&self) -> Vec<Label> {
        self.documents.iter().map(|d| d.label).collect()
    }

    /// Number of documents per label, indexed by [`Label::index`].
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for doc in &self.documents {
            counts[doc.label.index()] += 1;
        }
        counts
    }
}

/// Read every `text` value from a headed CSV file.
pub fn load_texts(path: &Path) -> Result<Vec<String>> {
    let csv_error = |source: csv::Error| PipelineError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| csv_error(e.into()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers().map_err(csv_error)?.clone();
    if !headers.iter().any(|h| h == "text") {
        return Err(PipelineError::Csv {
            path: path.to_path_buf(),
            source: csv::Error::from(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "missing required column 'text'",
            )),
        });
    }

    let records: Vec<NewsRecord> = reader
        .deserialize()
        .collect::<std::result::Result<_, _>>()
        .map_err(csv_error)?;

    debug!(path = %path.display(), rows = records.len(), "loaded csv");
    Ok(records.into_iter().map(|r| r.text).collect())
}

/// Load, label, concatenate, shuffle and truncate the two corpora.
///
/// Genuine rows come first in the concatenation, fabricated rows second; the
/// seeded shuffle then mixes them and the first `sample_size` rows are kept.
pub fn assemble(
    true_csv: impl AsRef<Path>,
    fake_csv: impl AsRef<Path>,
    sample_size: usize,
    seed: u64,
) -> Result<Corpus> {
    let genuine = load_texts(true_csv.as_ref())?;
    let fake = load_texts(fake_csv.as_ref())?;
    info!(
        genuine = genuine.len(),
        fake = fake.len(),
        "loaded labeled corpora"
    );

    let documents = genuine
        .into_iter()
        .map(|text| Document {
            text,
            label: Label::Genuine,
        })
        .chain(fake.into_iter().map(|text| Document {
            text,
            label: Label::Fake,
        }))
        .collect();

    Ok(sample(Corpus::from_documents(documents), sample_size, seed))
}

/// Shuffle `corpus` with a seeded RNG and keep the first `sample_size` documents.
pub fn sample(corpus: Corpus, sample_size: usize, seed: u64) -> Corpus {
    let mut documents = corpus.documents;
    let mut rng = StdRng::seed_from_u64(seed);
    documents.shuffle(&mut rng);
    documents.truncate(sample_size);

    let sampled = Corpus::from_documents(documents);
    let [fake, genuine] = sampled.class_counts();
    info!(total = sampled.len(), genuine, fake, "sampled corpus");
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_label_indices() {
        assert_eq!(Label::Fake.index(), 0);
        assert_eq!(Label::Genuine.index(), 1);
        assert_eq!(Label::from_index(1), Some(Label::Genuine));
        assert_eq!(Label::from_index(2), None);
        assert_eq!(Label::Genuine.to_string(), "1");
    }

    #[test]
    fn test_load_texts_ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "true.csv",
            "title,text,subject,date\n\"A\",\"Body one, with comma\",politics,2017\nB,Body two,news,2016\n",
        );
        let texts = load_texts(&path).unwrap();
        assert_eq!(texts, vec!["Body one, with comma", "Body two"]);
    }

    #[test]
    fn test_missing_text_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "bad.csv", "title,body\nA,B\n");
        let err = load_texts(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Csv { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_texts(Path::new("/nonexistent/true.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Csv { .. }));
    }

    #[test]
    fn test_assemble_labels_and_samples() {
        let dir = TempDir::new().unwrap();
        let true_csv = write_csv(&dir, "true.csv", "text\ng1\ng2\ng3\n");
        let fake_csv = write_csv(&dir, "fake.csv", "text\nf1\nf2\n");

        let corpus = assemble(&true_csv, &fake_csv, 100, 7).unwrap();
        assert_eq!(corpus.len(), 5);
        assert_eq!(corpus.class_counts(), [2, 3]);
        for doc in corpus.documents() {
            let expected = if doc.text.starts_with('g') {
                Label::Genuine
            } else {
                Label::Fake
            };
            assert_eq!(doc.label, expected);
        }

        let small = assemble(&true_csv, &fake_csv, 3, 7).unwrap();
        assert_eq!(small.len(), 3);
    }

    #[test]
    fn test_sample_is_reproducible() {
        let docs: Vec<Document> = (0..50)
            .map(|i| Document {
                text: format!("doc {}", i),
                label: if i % 2 == 0 { Label::Genuine } else { Label::Fake },
            })
            .collect();
        let a = sample(Corpus::from_documents(docs.clone()), 20, 42);
        let b = sample(Corpus::from_documents(docs.clone()), 20, 42);
        let c = sample(Corpus::from_documents(docs), 20, 43);
        assert_eq!(a.documents(), b.documents());
        assert_ne!(a.documents(), c.documents());
    }
}
