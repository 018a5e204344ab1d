//! Text normalization for job titles and queries
//!
//! Turns free text into a canonical, space-separated token sequence. The
//! steps run in a fixed order because each one changes what the next sees:
//!
//! 1. lowercase and compose (NFC)
//! 2. split on Unicode word boundaries
//! 3. drop English stop words and tokens containing punctuation
//! 4. rejoin with single spaces
//! 5. transliterate the joined string to ASCII
//! 6. re-tokenize and lemmatize every token
//! 7. rejoin
//!
//! The output is a fixed point: normalizing it again returns it unchanged.
//!
//! # Usage
//!
//! ```ignore
//! use talentrank_lib::normalize::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new();
//! assert_eq!(normalizer.normalize("Senior Software Engineers!"), "senior software engineer");
//! ```

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Deterministic title/query normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize `text` into its canonical token sequence.
    ///
    /// Returns an empty string when nothing survives filtering.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let lowered: String = text.to_lowercase().nfc().collect();

        let kept: Vec<&str> = tokenize(&lowered)
            .filter(|t| !is_stopword(t) && !has_punctuation(t))
            .collect();

        let folded = fold_to_ascii(&kept.join(" "));

        // a lemma can itself be a stop word ("owns" -> "own"); drop it here
        // so a second pass has nothing left to remove
        tokenize(&folded)
            .map(lemmatize)
            .filter(|lemma| !is_stopword(lemma))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Shorthand for [`TextNormalizer::normalize`].
#[must_use]
pub fn normalize(text: &str) -> String {
    TextNormalizer.normalize(text)
}

/// Split text into word tokens on Unicode word boundaries, skipping whitespace.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_word_bounds().filter(|s| !s.trim().is_empty())
}

// Combining marks belong to the letter before them; folding removes them later.
fn has_punctuation(token: &str) -> bool {
    token
        .chars()
        .any(|c| !c.is_alphanumeric() && !is_combining_mark(c))
}

/// Transliterate to lowercase ASCII letters, digits and spaces.
///
/// Compatibility decomposition splits accented letters into base + mark and
/// expands ligatures; marks are dropped, a few letters without a
/// decomposition are mapped by hand, and anything else non-ASCII is removed.
/// ASCII punctuation produced by decomposition (e.g. `⑴` -> `(1)`) becomes
/// a word break.
pub fn fold_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii() {
            out.push(' ');
        } else if is_combining_mark(c) {
            continue;
        } else if let Some(ascii) = fold_special(c) {
            out.push_str(ascii);
        }
    }
    out
}

fn fold_special(c: char) -> Option<&'static str> {
    Some(match c {
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'ł' | 'Ł' => "l",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'þ' | 'Þ' => "th",
        'ħ' | 'Ħ' => "h",
        'ŧ' | 'Ŧ' => "t",
        'ı' => "i",
        _ => return None,
    })
}

mod lemma;
mod stopwords;

pub use lemma::lemmatize;
pub use stopwords::is_stopword;
