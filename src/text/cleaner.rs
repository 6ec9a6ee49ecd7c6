//! Article text normalization.
//!
//! [`TextCleaner::clean`] turns one raw article into a space-joined sequence of
//! lowercase, lemmatized content words. The stages run in a fixed order and each
//! one relies on the shape the previous stage leaves behind:
//!
//! 1. strip HTML/XML markup, keeping inner text
//! 2. lowercase
//! 3. drop `[bracketed]` spans
//! 4. drop tokens starting with `http`
//! 5. drop stopword tokens, blank out punctuation inside the rest
//! 6. drop tokens containing a numeral
//! 7. drop curly quotes and ellipses
//! 8. drop newlines
//! 9. split on runs of non-word characters
//! 10. drop stopwords again and lemmatize
//! 11. join with single spaces
//!
//! Cleaning is not idempotent: lemmatizing can produce a stopword that only a
//! second pass drops (`wills` → `will` → ``).

use super::lemmatizer::Lemmatizer;
use super::stopwords::{english_stop_words, is_punctuation, stop_words_with_punctuation};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

static SCRIPT_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap()
});
static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:/?[A-Za-z][^<>]*|![^<>]*|\?[^<>]*)>").unwrap());
static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());
static BRACKET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S*").unwrap());
static NUMERAL_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*\p{N}\S*").unwrap());
static NON_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

static DEFAULT_CLEANER: LazyLock<TextCleaner> = LazyLock::new(TextCleaner::new);

/// Curly quotes and the ellipsis character.
const TYPOGRAPHIC_MARKS: &[char] = &['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2026}'];

/// Clean `text` with the built-in stopword list and lemma tables.
pub fn clean(text: &str) -> String {
    DEFAULT_CLEANER.clean(text)
}

/// Deterministic article normalizer.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    /// Stopwords plus single punctuation characters, checked per whitespace token
    token_stop_words: HashSet<String>,
    /// Stopwords checked per word token after splitting on non-word runs
    word_stop_words: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl TextCleaner {
    /// Create a cleaner with the built-in English resources.
    pub fn new() -> Self {
        TextCleaner {
            token_stop_words: stop_words_with_punctuation(),
            word_stop_words: english_stop_words(),
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// Add domain stopwords on top of the English list.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            self.token_stop_words.insert(word.clone());
            self.word_stop_words.insert(word);
        }
        self
    }

    /// Normalize one document.
    pub fn clean(&self, text: &str) -> String {
        let text = strip_markup(text);
        let text = text.to_lowercase();
        let text = BRACKET_REGEX.replace_all(&text, "");
        let text = URL_REGEX.replace_all(&text, "");
        let text = self.remove_stopwords_and_punctuation(&text);
        let text = NUMERAL_TOKEN_REGEX.replace_all(&text, "");
        let text: String = text
            .chars()
            .filter(|c| !TYPOGRAPHIC_MARKS.contains(c) && *c != '\n' && *c != '\r')
            .collect();

        NON_WORD_REGEX
            .split(&text)
            .filter(|word| !word.is_empty() && !self.word_stop_words.contains(*word))
            .map(|word| self.lemmatizer.lemmatize(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Clean a batch of documents.
    pub fn clean_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.clean(t.as_ref())).collect()
    }

    fn remove_stopwords_and_punctuation(&self, text: &str) -> String {
        let mut kept = Vec::new();
        for token in text.split_whitespace() {
            if self.token_stop_words.contains(&token.trim().to_lowercase()) {
                continue;
            }
            let blanked: String = token
                .chars()
                .map(|c| if is_punctuation(c) { ' ' } else { c })
                .collect();
            let blanked = blanked.trim();
            if !blanked.is_empty() {
                kept.push(blanked.to_string());
            }
        }
        kept.join(" ")
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove markup and decode character entities, keeping the text between tags.
///
/// Tags are removed without inserting whitespace, so `<b>fake</b>news` reads
/// `fakenews`. A `<` that does not open a tag is left as text.
pub fn strip_markup(text: &str) -> String {
    let text = SCRIPT_STYLE_REGEX.replace_all(text, "");
    let text = COMMENT_REGEX.replace_all(&text, "");
    let text = TAG_REGEX.replace_all(&text, "");
    ENTITY_REGEX
        .replace_all(&text, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(&['x', 'X'][..]) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        _ => return None,
    };
    Some(decoded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaking_news_example() {
        let cleaned = clean("<p>BREAKING: Visit http://x.com NOW!! [ad] 2024</p>");
        assert_eq!(cleaned, "breaking visit");
    }

    #[test]
    fn test_deterministic() {
        let text = "The <b>Senators</b> said [Reuters] on Tuesday that 3 bills passed.";
        assert_eq!(clean(text), clean(text));
        assert_eq!(clean(text), "senator said tuesday bill passed");
    }

    #[test]
    fn test_markup_removed() {
        let cleaned = clean("<div class=\"story\"><h1>Election</h1><script>var x = 1;</script></div>");
        assert_eq!(cleaned, "election");
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains("div"));
        assert!(!cleaned.contains("script"));
    }

    #[test]
    fn test_entities_decoded_and_stripped() {
        assert_eq!(strip_markup("Tom &amp; Jerry &#8220;live&#8221;"), "Tom & Jerry \u{201C}live\u{201D}");
        assert_eq!(strip_markup("&bogus; text"), "&bogus; text");
        assert_eq!(clean("Tom &amp; Jerry &#8220;live&#8221;"), "tom jerry live");
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn test_urls_removed() {
        let cleaned = clean("Source: https://www.example.com/article?id=7 and http://t.co/abc");
        assert_eq!(cleaned, "source");
    }

    #[test]
    fn test_brackets_removed() {
        let cleaned = clean("Officials [citation needed] confirmed [Video] the plan");
        assert!(!cleaned.contains("citation"));
        assert!(!cleaned.contains("video"));
        assert_eq!(cleaned, "official confirmed plan");
    }

    #[test]
    fn test_digits_and_newlines_removed() {
        let cleaned = clean("Over 1,000 people\nmarched on 5th Avenue in 2017\r\n");
        assert!(!cleaned.chars().any(|c| c.is_numeric()));
        assert!(!cleaned.contains('\n'));
        assert_eq!(cleaned, "people marched avenue");
    }

    #[test]
    fn test_punctuation_inside_tokens() {
        assert_eq!(clean("state-run media's \u{201C}fake\u{201D} claims\u{2026}"), "state run medium fake claim");
    }

    #[test]
    fn test_stopwords_removed_after_punctuation_split() {
        // "now!!" survives the whitespace pass and is caught by the word pass
        assert_eq!(clean("Now!! -- Here."), "");
    }

    #[test]
    fn test_extra_stopwords() {
        let cleaner = TextCleaner::new().with_extra_stopwords(["Reuters", "said"]);
        assert_eq!(cleaner.clean("WASHINGTON (Reuters) - The senator said no"), "washington senator");
    }

    #[test]
    fn test_not_idempotent() {
        let once = clean("wills");
        assert_eq!(once, "will");
        assert_eq!(clean(&once), "");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n\t "), "");
    }

    mod properties {
        use crate::text::clean;
        use proptest::prelude::*;

        /// One piece of a synthetic article. Tag names and bracket contents
        /// carry a marker word so their removal can be checked.
        fn fragment() -> impl Strategy<Value = String> {
            prop_oneof![
                4 => "[a-zA-Z]{1,10}",
                2 => "</?qqtag[a-z]{0,3}( [a-z]{1,5}=\"[a-z]{0,5}\")?>",
                2 => "https?://[a-z]{1,8}\\.[a-z]{2,3}(/[a-z0-9]{0,6})?",
                2 => "\\[[0-9 ]{0,4}qqbracket[a-z ]{0,6}\\]",
                2 => "[a-z]{0,3}[0-9]{1,4}[a-z]{0,3}",
                1 => "[!?.,;:()'-]{1,3}",
                1 => Just("\n".to_string()),
                1 => Just("\r\n".to_string()),
            ]
        }

        fn article() -> impl Strategy<Value = String> {
            prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.join(" "))
        }

        proptest! {
            #[test]
            fn cleaning_is_deterministic(text in article()) {
                prop_assert_eq!(clean(&text), clean(&text));
            }

            #[test]
            fn cleaned_text_has_no_markup_urls_or_brackets(text in article()) {
                let cleaned = clean(&text);
                prop_assert!(!cleaned.contains('<') && !cleaned.contains('>'), "{:?} -> {:?}", text, cleaned);
                prop_assert!(!cleaned.contains("qqtag"), "{:?} -> {:?}", text, cleaned);
                prop_assert!(!cleaned.contains("http"), "{:?} -> {:?}", text, cleaned);
                prop_assert!(!cleaned.contains('[') && !cleaned.contains(']'), "{:?} -> {:?}", text, cleaned);
                prop_assert!(!cleaned.contains("qqbracket"), "{:?} -> {:?}", text, cleaned);
            }

            #[test]
            fn cleaned_text_has_no_digits_or_newlines(text in article()) {
                let cleaned = clean(&text);
                prop_assert!(!cleaned.chars().any(|c| c.is_numeric()), "{:?} -> {:?}", text, cleaned);
                prop_assert!(!cleaned.contains('\n') && !cleaned.contains('\r'));
            }
        }
    }
}
