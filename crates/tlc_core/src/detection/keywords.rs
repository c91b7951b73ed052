//! Track-name keyword matching.
//!
//! A track called "English Dub" or "[JPN] Commentary" already says what it
//! is. Matches are case-insensitive and anchored on word boundaries, so
//! "eng" never matches inside "engine".

use regex::Regex;

use super::languages;

/// A language found in a track name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Canonical ISO 639-2/T code.
    pub code: String,
    /// The text that matched, as written in the name.
    pub matched: String,
}

#[derive(Debug, Clone)]
struct Candidate {
    code: String,
    pattern: Regex,
}

/// Matches track names against a priority-ordered list of languages and
/// a set of annotation keywords.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    candidates: Vec<Candidate>,
    annotation_keywords: Vec<String>,
}

impl KeywordMatcher {
    /// Build a matcher.
    ///
    /// Each candidate matches on its English name, its three-letter codes
    /// and informal tags like "jp"; two-letter codes are included when
    /// `match_two_letter_codes` is set.
    pub fn new<S: AsRef<str>>(
        candidates: &[S],
        annotation_keywords: &[S],
        match_two_letter_codes: bool,
    ) -> Self {
        let candidates = candidates
            .iter()
            .filter_map(|c| candidate(c.as_ref(), match_two_letter_codes))
            .collect();

        Self {
            candidates,
            annotation_keywords: annotation_keywords
                .iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// First candidate language named in `name`, in priority order.
    pub fn find_language(&self, name: &str) -> Option<KeywordMatch> {
        self.candidates.iter().find_map(|c| {
            c.pattern.find(name).map(|m| KeywordMatch {
                code: c.code.clone(),
                matched: m.as_str().to_string(),
            })
        })
    }

    /// Whether `name` marks a signs/songs style annotation track.
    pub fn is_annotation(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.annotation_keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

/// Compile the whole-word pattern for one candidate code.
fn candidate(code: &str, match_two_letter_codes: bool) -> Option<Candidate> {
    let code = languages::standardize(code);
    let mut terms: Vec<String> = vec![code.clone()];

    if let Some(lang) = languages::lookup(&code) {
        terms.insert(0, lang.name.to_string());
        if let Some(b) = lang.alpha3_b {
            terms.push(b.to_string());
        }
        if match_two_letter_codes {
            if let Some(two) = lang.alpha2 {
                terms.push(two.to_string());
            }
        }
    }
    terms.extend(languages::aliases_for(&code).map(str::to_string));

    let alternatives: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));

    match Regex::new(&pattern) {
        Ok(pattern) => Some(Candidate { code, pattern }),
        Err(e) => {
            tracing::warn!("Skipping keyword candidate '{}': {}", code, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new(
            &["eng", "jpn", "spa", "fra", "deu"],
            &["sign", "music", "song", "s&s"],
            true,
        )
    }

    #[test]
    fn display_name_matches() {
        let m = matcher().find_language("French Dub").unwrap();
        assert_eq!(m.code, "fra");
        assert_eq!(m.matched, "French");
    }

    #[test]
    fn codes_match_as_whole_words() {
        assert_eq!(matcher().find_language("[ENG] Full Subs").unwrap().code, "eng");
        assert_eq!(matcher().find_language("Signs (ger)").unwrap().code, "deu");
        assert_eq!(matcher().find_language("jp.ja").unwrap().code, "jpn");
        assert_eq!(matcher().find_language("JP Dub").unwrap().code, "jpn");
        assert_eq!(matcher().find_language("[JP] Full").unwrap().matched, "JP");
        assert!(matcher().find_language("Jpeg artifacts").is_none());
    }

    #[test]
    fn informal_tags_match_without_two_letter_codes() {
        let m = KeywordMatcher::new(&["eng", "jpn"], &[], false);
        assert_eq!(m.find_language("JP Dub").unwrap().code, "jpn");
        assert_eq!(m.find_language("Jap audio").unwrap().code, "jpn");
        assert!(m.find_language("ja").is_none());
    }

    #[test]
    fn no_partial_word_matches() {
        assert!(matcher().find_language("Engine noises").is_none());
        assert!(matcher().find_language("Friend").is_none());
        assert!(matcher().find_language("Spanner").is_none());
        assert!(matcher().find_language("Commentary").is_none());
    }

    #[test]
    fn priority_order_wins() {
        // Both present, eng listed first
        assert_eq!(matcher().find_language("Japanese / English").unwrap().code, "eng");
    }

    #[test]
    fn two_letter_codes_can_be_disabled() {
        let m = KeywordMatcher::new(&["eng"], &[], false);
        assert!(m.find_language("en").is_none());
        assert!(m.find_language("eng").is_some());
    }

    #[test]
    fn annotation_keywords_are_substrings() {
        let m = matcher();
        assert!(m.is_annotation("Signs & Songs"));
        assert!(m.is_annotation("S&S"));
        assert!(m.is_annotation("Music only"));
        assert!(!m.is_annotation("Full Subtitles"));
    }
}
