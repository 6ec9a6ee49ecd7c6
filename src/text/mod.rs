//! Text normalization: markup stripping, stopword removal and lemmatization.
//!
//! - [`cleaner`] - The article cleaning pipeline
//! - [`lemmatizer`] - Table-driven noun lemmatizer
//! - [`stopwords`] - English stopwords and punctuation

pub mod cleaner;
pub mod lemmatizer;
pub mod stopwords;

pub use cleaner::{clean, strip_markup, TextCleaner};
pub use lemmatizer::Lemmatizer;
