//! Command-line interface for the fake-news experiments.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::run_experiments;
use crate::text::clean;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "fakenews",
    version,
    about = "Genuine vs. fabricated news classification experiments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every configured vectorizer × model combination and print the reports.
    Run {
        /// TOML configuration file; built-in defaults are used when it is missing.
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,

        /// CSV of genuine articles (overrides data.true_csv).
        #[arg(long)]
        true_csv: Option<PathBuf>,

        /// CSV of fabricated articles (overrides data.fake_csv).
        #[arg(long)]
        fake_csv: Option<PathBuf>,

        /// Documents kept after shuffling (overrides data.sample_size).
        #[arg(long)]
        sample_size: Option<usize>,

        /// Random seed (overrides data.seed).
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated vectorizers, e.g. `tfidf,count`.
        #[arg(long, value_delimiter = ',')]
        vectorizer: Vec<String>,

        /// Comma-separated models, e.g. `naive_bayes,decision_tree`.
        #[arg(long, value_delimiter = ',')]
        model: Vec<String>,
    },

    /// Print the cleaned form of TEXT.
    Clean {
        /// Raw article text
        text: String,
    },
}

/// Read `path`, or fall back to defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        info!(path = %path.display(), "loading configuration");
        Config::load(path)
    } else {
        warn!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

impl Command {
    /// Execute the subcommand.
    pub fn execute(self) -> Result<()> {
        match self {
            Command::Run {
                config,
                true_csv,
                fake_csv,
                sample_size,
                seed,
                vectorizer,
                model,
            } => {
                let mut config = load_config(&config)?;
                if let Some(path) = true_csv {
                    config.data.true_csv = path;
                }
                if let Some(path) = fake_csv {
                    config.data.fake_csv = path;
                }
                if let Some(n) = sample_size {
                    config.data.sample_size = n;
                }
                if let Some(seed) = seed {
                    config.data.seed = seed;
                }
                if !vectorizer.is_empty() {
                    config.experiment.vectorizers = vectorizer;
                }
                if !model.is_empty() {
                    config.experiment.models = model;
                }

                let results = run_experiments(&config)?;
                println!("Summary:");
                for (name, report) in &results {
                    println!("  {:<40} {:.2}%", name, report.accuracy * 100.0);
                }
                Ok(())
            }
            Command::Clean { text } => {
                println!("{}", clean(&text));
                Ok(())
            }
        }
    }
}
