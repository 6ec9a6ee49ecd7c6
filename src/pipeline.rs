//! End-to-end experiment: clean, split, vectorize, fit, predict, report.

use crate::config::Config;
use crate::data::{self, Corpus, Document};
use crate::error::Result;
use crate::features::{Vectorizer, VectorizerKind};
use crate::models::{Classifier, ModelKind};
use crate::report::{ClassificationReport, ConfusionMatrix};
use crate::split::StratifiedSplitter;
use crate::text::TextCleaner;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one (vectorizer, model) run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// `(documents, features)` of the training matrix
    pub train_shape: (usize, usize),
    /// `(documents, features)` of the test matrix
    pub test_shape: (usize, usize),
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "train matrix: {} x {}", self.train_shape.0, self.train_shape.1)?;
        writeln!(f, "test matrix:  {} x {}", self.test_shape.0, self.test_shape.1)?;
        writeln!(f, "accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

/// One configured vectorizer/model combination and the stages around it.
pub struct Pipeline {
    cleaner: TextCleaner,
    splitter: StratifiedSplitter,
    vectorizer: Box<dyn Vectorizer>,
    model: Box<dyn Classifier>,
}

impl Pipeline {
    /// Construct every stage up front from `config`.
    pub fn build(vectorizer: VectorizerKind, model: ModelKind, config: &Config) -> Self {
        Pipeline {
            cleaner: TextCleaner::new().with_extra_stopwords(&config.features.extra_stopwords),
            splitter: StratifiedSplitter::new(config.split.train_fraction, config.data.seed),
            vectorizer: vectorizer.build(config.vectorizer_params()),
            model: model.build(&config.model_params()),
        }
    }

    /// `"<vectorizer> + <model>"`
    pub fn label(&self) -> String {
        format!("{} + {}", self.vectorizer.name(), self.model.name())
    }

    /// Run the whole experiment on `corpus`.
    pub fn run(&mut self, corpus: &Corpus) -> Result<RunReport> {
        let start = Instant::now();
        let cleaned = Corpus::from_documents(
            corpus
                .documents()
                .iter()
                .map(|doc| Document {
                    text: self.cleaner.clean(&doc.text),
                    label: doc.label,
                })
                .collect(),
        );
        debug!(documents = cleaned.len(), "cleaned corpus");

        let (train, test) = self.splitter.split(&cleaned)?;
        info!(train = train.len(), test = test.len(), "split corpus");

        let train_matrix = self.vectorizer.fit_transform(&train.texts)?;
        let test_matrix = self.vectorizer.transform(&test.texts)?;
        info!(
            vectorizer = self.vectorizer.name(),
            features = self.vectorizer.n_features(),
            "vectorized"
        );

        self.model.fit(&train_matrix, &train.labels)?;
        let predicted = self.model.predict(&test_matrix)?;

        let confusion = ConfusionMatrix::new(&test.labels, &predicted)?;
        let report = ClassificationReport::from_confusion(&confusion);
        info!(
            pipeline = %self.label(),
            accuracy = report.accuracy,
            elapsed_s = start.elapsed().as_secs_f64(),
            "run finished"
        );

        Ok(RunReport {
            train_shape: train_matrix.shape(),
            test_shape: test_matrix.shape(),
            accuracy: report.accuracy,
            report,
            confusion,
        })
    }
}

/// Run every configured vectorizer × model combination.
///
/// All selectors are parsed before any data is read, so a typo fails fast.
/// Each combination gets a freshly assembled corpus and fresh stages, and its
/// report is printed as soon as it finishes.
pub fn run_experiments(config: &Config) -> Result<Vec<(String, RunReport)>> {
    config.validate()?;
    let vectorizers = config.experiment.vectorizer_kinds()?;
    let models = config.experiment.model_kinds()?;

    let mut results = Vec::with_capacity(vectorizers.len() * models.len());
    for &vectorizer in &vectorizers {
        for &model in &models {
            let corpus = data::assemble(
                &config.data.true_csv,
                &config.data.fake_csv,
                config.data.sample_size,
                config.data.seed,
            )?;
            let mut pipeline = Pipeline::build(vectorizer, model, config);
            let name = pipeline.label();
            info!(pipeline = %name, "starting run");

            let report = pipeline.run(&corpus)?;
            println!("=== {} ===", name);
            println!("{}", report);
            results.push((name, report));
        }
    }
    Ok(results)
}
