//! # fakenews - genuine vs. fabricated news classification
//!
//! A small, deterministic text-classification toolkit: article cleaning,
//! stratified splitting, word n-gram vectorizers and four classic classifiers,
//! wired together into reproducible experiments.
//!
//! ## Pipeline
//!
//! 1. [`data::assemble`] loads a genuine and a fabricated CSV corpus (a `text`
//!    column is required), labels, shuffles and subsamples them.
//! 2. [`text::clean`] strips markup, URLs, bracketed spans, digits, stopwords
//!    and punctuation, then lemmatizes.
//! 3. [`split::stratified_split`] partitions into train and test sets that keep
//!    the class proportions.
//! 4. A [`features::Vectorizer`] (`tfidf` or `count`, 1- to 3-grams) is fitted
//!    on train and applied to test.
//! 5. A [`models::Classifier`] (`naive_bayes`, `logistic_regression`,
//!    `passive_aggressive`, `decision_tree`) is fitted and evaluated.
//! 6. [`report`] computes accuracy and a per-class classification report.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use fakenews::config::Config;
//! use fakenews::data;
//! use fakenews::features::VectorizerKind;
//! use fakenews::models::ModelKind;
//! use fakenews::pipeline::Pipeline;
//!
//! fn main() -> fakenews::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let corpus = data::assemble("data/True.csv", "data/Fake.csv", 5000, 42)?;
//!
//!     let mut pipeline = Pipeline::build(VectorizerKind::Tfidf, ModelKind::NaiveBayes, &config);
//!     let report = pipeline.run(&corpus)?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ### Cleaning a single article
//!
//! ```
//! let cleaned = fakenews::text::clean("<p>BREAKING: Visit http://x.com NOW!! [ad] 2024</p>");
//! assert_eq!(cleaned, "breaking visit");
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod split;
pub mod text;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use data::{Corpus, Document, Label};
pub use error::{PipelineError, Result};
pub use features::{Vectorizer, VectorizerKind};
pub use models::{Classifier, ModelKind};
pub use pipeline::{run_experiments, Pipeline, RunReport};
pub use report::{ClassificationReport, ConfusionMatrix};
