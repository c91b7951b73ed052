//! Classifier-ready text normalization.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading inline tag or code prefix, up to the first `;`.
static CODE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z$&+,:;=?@#|'<>.^*()%!-]*;").unwrap());

/// Digits and punctuation noise.
static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9$&+,:;=?@#|'<>.^*()%!-]").unwrap());

/// Runs of whitespace.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Three or more single-letter tokens in a row (OCR garbage like `a b c d`).
static SPACED_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w\s){3,}").unwrap());

/// A cleaned subtitle line. Never empty and always longer than the
/// normalizer's minimum length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedLine(String);

impl NormalizedLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips formatting and noise from raw subtitle lines.
///
/// Used identically for the track under test and for every comparison
/// track, so duplicate detection compares like with like.
#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    min_length: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self { min_length: 4 }
    }
}

impl TextNormalizer {
    /// Lines of `min_length` characters or fewer are discarded.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Normalize one line, or `None` if it should be discarded.
    pub fn normalize(&self, raw: &str) -> Option<NormalizedLine> {
        let text = CODE_PREFIX.replace(raw, "");
        let text = NOISE.replace_all(&text, " ");
        let text = WHITESPACE.replace_all(&text, " ");
        let text = text.trim();

        if SPACED_LETTERS.is_match(text) || text.chars().count() <= self.min_length {
            return None;
        }

        Some(NormalizedLine(text.to_string()))
    }

    /// Normalize a batch, keeping input order and dropping discarded lines.
    pub fn normalize_all<I, S>(&self, lines: I) -> Vec<NormalizedLine>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.normalize(line.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> Option<String> {
        TextNormalizer::default().normalize(s).map(NormalizedLine::into_inner)
    }

    #[test]
    fn strips_code_prefix() {
        assert_eq!(norm("pos;Where are you going").as_deref(), Some("Where are you going"));
        assert_eq!(norm("be;q;Where now").as_deref(), Some("Where now"));
    }

    #[test]
    fn digits_and_punctuation_become_spaces() {
        assert_eq!(norm("Wait... 10 more minutes!").as_deref(), Some("Wait more minutes"));
        assert_eq!(norm("It's fine").as_deref(), Some("It s fine"));
    }

    #[test]
    fn short_lines_are_discarded() {
        assert_eq!(norm("Yes!"), None);
        assert_eq!(norm("1234567"), None);
        assert_eq!(norm("   "), None);
        assert_eq!(norm("Hello").as_deref(), Some("Hello"));
    }

    #[test]
    fn spaced_letter_garbage_is_discarded() {
        assert_eq!(norm("a b c d e f"), None);
        assert_eq!(norm("I am here").as_deref(), Some("I am here"));
    }

    #[test]
    fn min_length_is_configurable() {
        let n = TextNormalizer::new(8);
        assert!(n.normalize("Hello there").is_some());
        assert!(n.normalize("Hello").is_none());
    }

    #[test]
    fn normalize_all_keeps_order() {
        let lines = TextNormalizer::default().normalize_all(["First line", "no", "Second line"]);
        let texts: Vec<_> = lines.iter().map(NormalizedLine::as_str).collect();
        assert_eq!(texts, vec!["First line", "Second line"]);
    }
}
