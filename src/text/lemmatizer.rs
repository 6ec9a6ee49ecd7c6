//! Dictionary-free noun lemmatizer.
//!
//! Reduces plural nouns to their singular base form with three fixed tables:
//!
//! - an exception table of irregular plurals (`children` → `child`)
//! - an invariant list of words that only look plural (`news`, `series`)
//! - WordNet-style suffix detachment rules (`-ies` → `-y`, `-ches` → `-ch`, ...)
//!
//! Every word is treated as a noun, the same default part of speech a WordNet
//! lemmatizer uses when none is given.

use std::collections::{HashMap, HashSet};

/// Irregular plural forms and their lemma.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("selves", "self"),
    ("calves", "calf"),
    ("loaves", "loaf"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("data", "datum"),
    ("media", "medium"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("hypotheses", "hypothesis"),
    ("diagnoses", "diagnosis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("appendices", "appendix"),
    ("cacti", "cactus"),
    ("fungi", "fungus"),
    ("nuclei", "nucleus"),
    ("radii", "radius"),
    ("stimuli", "stimulus"),
    ("alumni", "alumnus"),
    ("bacteria", "bacterium"),
    ("curricula", "curriculum"),
    ("memoranda", "memorandum"),
    ("quizzes", "quiz"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("viruses", "virus"),
    ("bonuses", "bonus"),
    ("campuses", "campus"),
    ("statuses", "status"),
    ("censuses", "census"),
    ("biases", "bias"),
    ("aliases", "alias"),
    ("atlases", "atlas"),
    ("lenses", "lens"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("zombies", "zombie"),
    ("calories", "calorie"),
    ("rookies", "rookie"),
    ("hippies", "hippie"),
    ("selfies", "selfie"),
    ("prairies", "prairie"),
    ("headaches", "headache"),
    ("niches", "niche"),
    ("caches", "cache"),
    ("avalanches", "avalanche"),
    ("moustaches", "moustache"),
    ("mustaches", "mustache"),
    ("cliches", "cliche"),
    ("psyches", "psyche"),
    ("goes", "go"),
];

/// Words ending in `s` whose base form is the word itself.
const INVARIANTS: &[&str] = &[
    "news",
    "series",
    "species",
    "means",
    "politics",
    "economics",
    "physics",
    "mathematics",
    "ethics",
    "athletics",
    "linguistics",
    "genetics",
    "logistics",
    "electronics",
    "aesthetics",
    "chaos",
    "christmas",
    "texas",
    "kansas",
    "arkansas",
    "whereas",
    "canvas",
    "pancreas",
    "always",
    "perhaps",
    "sometimes",
    "besides",
    "towards",
    "afterwards",
    "backwards",
    "upwards",
    "downwards",
    "reuters",
    "isis",
    "paris",
    "illinois",
    "yes",
    "gas",
    "bus",
    "lens",
    "bias",
    "alias",
    "atlas",
    "hamas",
    "vegas",
    "dallas",
    "honduras",
    "caracas",
    "thomas",
    "douglas",
    "nicholas",
    "lucas",
    "pampas",
];

/// Words ending in `men` that are not compounds of `man`.
const MEN_INVARIANTS: &[&str] = &[
    "specimen", "omen", "amen", "semen", "abdomen", "stamen", "regimen", "ramen", "yemen",
    "hymen", "acumen", "lumen", "bitumen", "albumen", "cyclamen", "carmen",
];

/// Plural-to-singular lemmatizer backed by fixed tables.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    invariants: HashSet<&'static str>,
    men_invariants: HashSet<&'static str>,
}

impl Lemmatizer {
    /// Create a lemmatizer with the built-in tables.
    pub fn new() -> Self {
        Lemmatizer {
            exceptions: EXCEPTIONS.iter().copied().collect(),
            invariants: INVARIANTS.iter().copied().collect(),
            men_invariants: MEN_INVARIANTS.iter().copied().collect(),
        }
    }

    /// Reduce `word` to its base form.
    ///
    /// Expects lowercase input. Words the tables do not recognise as plural are
    /// returned unchanged.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return (*lemma).to_string();
        }
        if self.invariants.contains(word) {
            return word.to_string();
        }

        if word.ends_with("men") && word.len() > 3 && !self.men_invariants.contains(word) {
            return format!("{}man", &word[..word.len() - 3]);
        }

        if !word.ends_with('s') || word.len() < 4 {
            return word.to_string();
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }

        if word.ends_with("ies") {
            // "lies", "ties": the y-rule would leave a two-letter stem
            return if word.len() > 4 {
                format!("{}y", &word[..word.len() - 3])
            } else {
                word[..word.len() - 1].to_string()
            };
        }

        for suffix in ["sses", "ches", "shes", "xes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }

        word[..word.len() - 1].to_string()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}
