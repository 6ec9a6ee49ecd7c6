//! Error types shared by every pipeline stage.

use std::path::PathBuf;

/// Errors raised while assembling, fitting or evaluating a pipeline run.
///
/// Every failure is fatal for the current run; nothing here is retried.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Filesystem error outside of CSV parsing (e.g. reading `config.toml`).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV input could not be read or a row lacks the `text` column.
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        /// The offending input file.
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// `config.toml` is not valid TOML or does not match the schema.
    #[error("could not parse configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The requested vectorizer selector is not one of the known strategies.
    #[error("unsupported vectorizer '{0}' (expected one of: tfidf, count)")]
    UnsupportedVectorizer(String),

    /// The requested model selector is not one of the known strategies.
    #[error(
        "unsupported model '{0}' (expected one of: naive_bayes, logistic_regression, passive_aggressive, decision_tree)"
    )]
    UnsupportedModel(String),

    /// The corpus cannot be partitioned with stratification.
    #[error("cannot split corpus: {0}")]
    DegenerateSplit(String),

    /// Document-frequency pruning left nothing to vectorize.
    #[error("empty vocabulary: {0}")]
    EmptyVocabulary(String),

    /// A numeric parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// `transform`/`predict` was called before `fit`.
    #[error("{0} used before it was fitted")]
    NotFitted(&'static str),

    /// Matrix rows, labels or feature counts disagree.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The label vector cannot be used for training or scoring.
    #[error("invalid labels: {0}")]
    InvalidLabels(String),
}

/// Convenience alias for `std::result::Result<T, PipelineError>`.
pub type Result<T> = std::result::Result<T, PipelineError>;
