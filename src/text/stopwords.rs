//! Built-in English stopword list and punctuation set.

use std::collections::HashSet;

/// The standard NLTK English stopword list (179 entries).
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't",
    "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
    "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// ASCII punctuation, in the order of Python's `string.punctuation`.
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Returns `true` for the characters listed in [`PUNCTUATION`].
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

/// English stopwords as an owned set.
pub fn english_stop_words() -> HashSet<String> {
    ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

/// English stopwords plus every punctuation character as a one-character word.
///
/// Used by the whitespace-token pass, where a bare `-` or `"` should be dropped
/// the same way a bare `the` is.
pub fn stop_words_with_punctuation() -> HashSet<String> {
    let mut set = english_stop_words();
    set.extend(PUNCTUATION.chars().map(|c| c.to_string()));
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_word_count() {
        assert_eq!(ENGLISH_STOP_WORDS.len(), 179);
        assert_eq!(english_stop_words().len(), 179);
    }

    #[test]
    fn test_punctuation_set() {
        assert_eq!(PUNCTUATION.chars().count(), 32);
        assert!(is_punctuation('!'));
        assert!(is_punctuation('\\'));
        assert!(!is_punctuation('a'));
        assert!(!is_punctuation('’'));

        let combined = stop_words_with_punctuation();
        assert!(combined.contains("the"));
        assert!(combined.contains("~"));
        assert_eq!(combined.len(), 179 + 32);
    }
}
