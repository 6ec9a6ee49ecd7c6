//! Word n-gram analyzer shared by the vectorizers.

use regex::Regex;
use std::sync::LazyLock;

/// Word tokens: two or more word characters.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Splits a document into word n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgramAnalyzer {
    min_n: usize,
    max_n: usize,
}

impl NgramAnalyzer {
    /// Analyzer producing every n-gram with `min_n <= n <= max_n`.
    ///
    /// Callers validate the range; `min_n` is clamped to 1 and `max_n` to `min_n`.
    pub fn new(min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        NgramAnalyzer {
            min_n,
            max_n: max_n.max(min_n),
        }
    }

    /// Lowercased word tokens of `document`.
    pub fn tokens(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        TOKEN_REGEX
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// All n-grams of `document`, shortest first, each joined by single spaces.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let tokens = self.tokens(document);
        let mut grams = Vec::new();
        for n in self.min_n..=self.max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        grams
    }
}

impl Default for NgramAnalyzer {
    fn default() -> Self {
        NgramAnalyzer::new(1, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unigrams_skip_single_characters() {
        let analyzer = NgramAnalyzer::new(1, 1);
        assert_eq!(analyzer.analyze("A senate vote, u s"), vec!["senate", "vote"]);
    }

    #[test]
    fn test_one_to_three_grams() {
        let analyzer = NgramAnalyzer::default();
        let grams = analyzer.analyze("house passes bill");
        assert_eq!(
            grams,
            vec![
                "house",
                "passes",
                "bill",
                "house passes",
                "passes bill",
                "house passes bill"
            ]
        );
    }

    #[test]
    fn test_short_documents() {
        let analyzer = NgramAnalyzer::new(2, 3);
        assert!(analyzer.analyze("single").is_empty());
        assert_eq!(analyzer.analyze("two words"), vec!["two words"]);
        assert!(analyzer.analyze("").is_empty());
    }
}
