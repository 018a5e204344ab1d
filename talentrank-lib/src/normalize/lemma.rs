//! Dictionary-free noun lemmatizer
//!
//! Reduces plural nouns to their singular base form with an irregular-form
//! table and a handful of suffix rules. Words that are not plain lowercase
//! ASCII letters (numbers, codes) pass through unchanged.

use std::collections::HashMap;
use std::sync::OnceLock;

const MAX_ROUNDS: usize = 4;

/// Irregular plural -> base form.
const IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("media", "medium"),
    ("curricula", "curriculum"),
    ("alumni", "alumnus"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("bases", "base"),
    ("leaves", "leaf"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("lives", "life"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("rookies", "rookie"),
    ("calories", "calorie"),
    ("niches", "niche"),
    ("caches", "cache"),
    ("headaches", "headache"),
];

/// Words that end like a plural but are already a base form.
const INVARIANT: &[&str] = &[
    "series", "species", "news", "means", "headquarters", "always", "perhaps", "besides",
    "towards", "afterwards", "sometimes", "bias", "alias", "atlas", "canvas", "chaos", "lens",
    "devops", "kubernetes", "diabetes", "specimen", "abdomen", "omen", "regimen", "acumen",
];

/// Endings that mark a singular word even though it ends in `s`.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ics"];

/// Stems that take `-es` in the plural.
const ES_STEMS: &[&str] = &["ss", "x", "zz", "ch", "sh"];

fn irregular() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| IRREGULAR.iter().copied().collect())
}

/// Lemmatize a single lowercase token.
///
/// Rules are applied until the word stops changing, so the result is always
/// a fixed point: `lemmatize(&lemmatize(w)) == lemmatize(w)`.
pub fn lemmatize(word: &str) -> String {
    let mut current = word.to_string();
    for _ in 0..MAX_ROUNDS {
        match step(&current) {
            Some(next) if next != current => current = next,
            _ => break,
        }
    }
    current
}

fn step(word: &str) -> Option<String> {
    if !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    if let Some(base) = irregular().get(word) {
        return Some((*base).to_string());
    }
    if word.len() <= 3
        || INVARIANT.contains(&word)
        || SINGULAR_ENDINGS.iter().any(|e| word.ends_with(e))
    {
        return None;
    }

    if let Some(stem) = word.strip_suffix("men") {
        return Some(format!("{stem}man"));
    }
    if let Some(stem) = word.strip_suffix("yses") {
        return Some(format!("{stem}ysis"));
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() > 1 {
            return Some(format!("{stem}y"));
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ES_STEMS.iter().any(|e| stem.ends_with(e)) {
            return Some(stem.to_string());
        }
    }
    word.strip_suffix('s').map(str::to_string)
}
