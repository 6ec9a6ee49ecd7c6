//! Configuration structures for the fake-news experiments.
//!
//! This module provides strongly-typed configuration management using TOML files.
//! The configuration covers the input corpora, the train/test split, feature
//! extraction, model hyperparameters and which experiment combinations to run.
//! Every key is optional; a missing key takes the value of [`Config::default`].

use crate::error::{PipelineError, Result};
use crate::features::{DfBound, VectorizerKind, VectorizerParams};
use crate::models::{ModelKind, ModelParams};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input corpora and sampling
    pub data: DataConfig,
    /// Train/test partitioning
    pub split: SplitConfig,
    /// Cleaning and vectorization
    pub features: FeaturesConfig,
    /// Model hyperparameters
    pub model: ModelConfig,
    /// Which combinations to run
    pub experiment: ExperimentConfig,
}

/// Input corpora and sampling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// CSV of genuine articles
    pub true_csv: PathBuf,
    /// CSV of fabricated articles
    pub fake_csv: PathBuf,
    /// Documents kept after the seeded shuffle
    pub sample_size: usize,
    /// Seed for sampling, splitting and the passive-aggressive sample order
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            true_csv: PathBuf::from("data/True.csv"),
            fake_csv: PathBuf::from("data/Fake.csv"),
            sample_size: 5000,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Share of documents used for training (e.g., 0.8 = 80% train, 20% test)
    pub train_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig { train_fraction: 0.8 }
    }
}

/// Cleaning and vectorization settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// Integer = document count, float = proportion of documents
    pub min_df: DfBound,
    /// Integer = document count, float = proportion of documents
    pub max_df: DfBound,
    pub max_features: Option<usize>,
    /// Words removed in addition to the English stopword list
    pub extra_stopwords: Vec<String>,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        let params = VectorizerParams::default();
        FeaturesConfig {
            ngram_min: params.ngram_range.0,
            ngram_max: params.ngram_range.1,
            min_df: params.min_df,
            max_df: params.max_df,
            max_features: params.max_features,
            extra_stopwords: Vec::new(),
        }
    }
}

impl From<&FeaturesConfig> for VectorizerParams {
    fn from(config: &FeaturesConfig) -> Self {
        VectorizerParams {
            ngram_range: (config.ngram_min, config.ngram_max),
            min_df: config.min_df,
            max_df: config.max_df,
            max_features: config.max_features,
        }
    }
}

/// Hyperparameters for every model; each model reads the keys it uses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub alpha: f64,
    pub c: f64,
    pub lr_max_iter: usize,
    pub lr_tol: f64,
    pub pa_max_iter: usize,
    pub pa_tol: f64,
    pub n_iter_no_change: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let params = ModelParams::default();
        ModelConfig {
            alpha: params.alpha,
            c: params.c,
            lr_max_iter: params.lr_max_iter,
            lr_tol: params.lr_tol,
            pa_max_iter: params.pa_max_iter,
            pa_tol: params.pa_tol,
            n_iter_no_change: params.n_iter_no_change,
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
        }
    }
}

/// Selectors of the vectorizer and model strategies to cross.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    pub vectorizers: Vec<String>,
    pub models: Vec<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            vectorizers: VectorizerKind::ALL.iter().map(|k| k.to_string()).collect(),
            models: ModelKind::ALL.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl ExperimentConfig {
    /// Parse every vectorizer selector; the first unknown one is an error.
    pub fn vectorizer_kinds(&self) -> Result<Vec<VectorizerKind>> {
        self.vectorizers.iter().map(|s| s.parse()).collect()
    }

    /// Parse every model selector; the first unknown one is an error.
    pub fn model_kinds(&self) -> Result<Vec<ModelKind>> {
        self.models.iter().map(|s| s.parse()).collect()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// Returns `Ok(Config)` if successful, or an error if the file cannot be read
    /// or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Vectorizer settings derived from `[features]`.
    pub fn vectorizer_params(&self) -> VectorizerParams {
        VectorizerParams::from(&self.features)
    }

    /// Model settings derived from `[model]`, seeded from `[data]`.
    pub fn model_params(&self) -> ModelParams {
        let m = &self.model;
        ModelParams {
            alpha: m.alpha,
            c: m.c,
            lr_max_iter: m.lr_max_iter,
            lr_tol: m.lr_tol,
            pa_max_iter: m.pa_max_iter,
            pa_tol: m.pa_tol,
            n_iter_no_change: m.n_iter_no_change,
            max_depth: m.max_depth,
            min_samples_split: m.min_samples_split,
            min_samples_leaf: m.min_samples_leaf,
            seed: self.data.seed,
        }
    }

    /// Check value ranges and experiment selectors.
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(PipelineError::Config(message))
        }

        if self.data.sample_size == 0 {
            return invalid("data.sample_size must be positive".to_string());
        }
        let fraction = self.split.train_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return invalid(format!(
                "split.train_fraction must be in (0, 1), got {}",
                fraction
            ));
        }

        let f = &self.features;
        if f.ngram_min == 0 || f.ngram_max < f.ngram_min {
            return invalid(format!(
                "features.ngram_min/ngram_max must satisfy 1 <= min <= max, got {}..{}",
                f.ngram_min, f.ngram_max
            ));
        }
        for (name, bound) in [("min_df", f.min_df), ("max_df", f.max_df)] {
            if let DfBound::Proportion(p) = bound {
                if !(0.0..=1.0).contains(&p) {
                    return invalid(format!("features.{} proportion must be in [0, 1], got {}", name, p));
                }
            }
        }
        if f.max_features == Some(0) {
            return invalid("features.max_features must be positive when set".to_string());
        }

        let m = &self.model;
        if m.alpha.is_nan() || m.alpha <= 0.0 {
            return invalid(format!("model.alpha must be positive, got {}", m.alpha));
        }
        if m.c.is_nan() || m.c <= 0.0 {
            return invalid(format!("model.c must be positive, got {}", m.c));
        }
        if m.lr_max_iter == 0 || m.pa_max_iter == 0 {
            return invalid("model.lr_max_iter and model.pa_max_iter must be positive".to_string());
        }
        if m.n_iter_no_change == 0 {
            return invalid("model.n_iter_no_change must be positive".to_string());
        }
        if m.min_samples_split < 2 || m.min_samples_leaf == 0 {
            return invalid(format!(
                "model.min_samples_split must be >= 2 and min_samples_leaf >= 1, got {} and {}",
                m.min_samples_split, m.min_samples_leaf
            ));
        }

        if self.experiment.vectorizers.is_empty() || self.experiment.models.is_empty() {
            return invalid("experiment.vectorizers and experiment.models must not be empty".to_string());
        }
        self.experiment.vectorizer_kinds()?;
        self.experiment.model_kinds()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data.sample_size, 5000);
        assert_eq!(config.split.train_fraction, 0.8);
        assert_eq!(config.vectorizer_params(), VectorizerParams::default());
        assert_eq!(config.model_params(), ModelParams::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [data]
            sample_size = 200
            seed = 7

            [features]
            max_df = 1

            [experiment]
            models = ["nb"]
            "#,
        )
        .unwrap();
        assert_eq!(config.data.sample_size, 200);
        assert_eq!(config.data.true_csv, PathBuf::from("data/True.csv"));
        assert_eq!(config.features.max_df, DfBound::Count(1));
        assert_eq!(config.model_params().seed, 7);
        assert_eq!(config.experiment.model_kinds().unwrap(), vec![ModelKind::NaiveBayes]);
        assert_eq!(config.experiment.vectorizers, vec!["tfidf", "count"]);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_toml("[data]\nsampel_size = 3").unwrap_err();
        assert!(matches!(err, PipelineError::TomlParse(_)));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = Config::default();
        config.split.train_fraction = 1.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let mut config = Config::default();
        config.features.ngram_min = 3;
        config.features.ngram_max = 2;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let mut config = Config::default();
        config.model.c = 0.0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_selectors() {
        let mut config = Config::default();
        config.experiment.vectorizers = vec!["bag-of-words".to_string()];
        assert!(matches!(
            config.validate(),
            Err(PipelineError::UnsupportedVectorizer(_))
        ));

        let mut config = Config::default();
        config.experiment.models = vec!["svm".to_string()];
        assert!(matches!(
            config.validate(),
            Err(PipelineError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
        let config = Config::load(path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.model_params(), ModelParams::default());
    }
}
