//! Language inference by elimination.
//!
//! When the languages already known in a file leave exactly one possibility
//! for an unknown subtitle track, that track is assigned without looking at
//! its content. Each rule is a pure predicate over the file's counts.

use super::languages;
use crate::models::{LanguageClass, Track, TrackType};

/// The two expected languages of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    /// Original-language audio (e.g. "jpn").
    pub primary: String,
    /// Dub/translation language (e.g. "eng").
    pub secondary: String,
}

impl LanguagePair {
    pub fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: languages::standardize(primary),
            secondary: languages::standardize(secondary),
        }
    }

    /// Which class a declared language falls into.
    pub fn classify(&self, language: &str) -> LanguageClass {
        let language = languages::standardize(language);
        if language == self.primary {
            LanguageClass::Primary
        } else if language == self.secondary {
            LanguageClass::Secondary
        } else {
            LanguageClass::Unknown
        }
    }

    /// Language code for a known class.
    pub fn code_for(&self, class: LanguageClass) -> Option<&str> {
        match class {
            LanguageClass::Primary => Some(&self.primary),
            LanguageClass::Secondary => Some(&self.secondary),
            LanguageClass::Unknown => None,
        }
    }
}

/// Per-file counts of (track type, language class).
///
/// The sum of all counts always equals the number of audio and subtitle
/// tracks in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackLanguageCounts {
    counts: [[usize; 3]; 2],
}

fn type_index(track_type: TrackType) -> usize {
    match track_type {
        TrackType::Audio => 0,
        TrackType::Subtitles => 1,
    }
}

fn class_index(class: LanguageClass) -> usize {
    match class {
        LanguageClass::Primary => 0,
        LanguageClass::Secondary => 1,
        LanguageClass::Unknown => 2,
    }
}

impl TrackLanguageCounts {
    /// Count the tracks of a file.
    pub fn from_tracks(tracks: &[Track], pair: &LanguagePair) -> Self {
        let mut counts = Self::default();
        for track in tracks {
            counts.add(track.track_type, pair.classify(&track.language));
        }
        counts
    }

    pub fn get(&self, track_type: TrackType, class: LanguageClass) -> usize {
        self.counts[type_index(track_type)][class_index(class)]
    }

    pub fn add(&mut self, track_type: TrackType, class: LanguageClass) {
        self.counts[type_index(track_type)][class_index(class)] += 1;
    }

    /// Move one track from one class to another after a language change.
    pub fn reassign(&mut self, track_type: TrackType, from: LanguageClass, to: LanguageClass) {
        let row = &mut self.counts[type_index(track_type)];
        if row[class_index(from)] > 0 {
            row[class_index(from)] -= 1;
            row[class_index(to)] += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Tracks whose language is primary or secondary.
    pub fn known(&self) -> usize {
        self.total() - self.unknown(TrackType::Audio) - self.unknown(TrackType::Subtitles)
    }

    pub fn unknown(&self, track_type: TrackType) -> usize {
        self.get(track_type, LanguageClass::Unknown)
    }

    pub fn primary(&self, track_type: TrackType) -> usize {
        self.get(track_type, LanguageClass::Primary)
    }

    pub fn secondary(&self, track_type: TrackType) -> usize {
        self.get(track_type, LanguageClass::Secondary)
    }
}

/// What a rule sees about the track under evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EliminationInput<'a> {
    pub counts: &'a TrackLanguageCounts,
    /// The track name carries an annotation keyword (signs, songs).
    pub is_annotation: bool,
}

/// One elimination rule.
pub trait EliminationRule: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// The class the track must belong to, or `None` if this rule does not apply.
    fn assign(&self, input: &EliminationInput<'_>) -> Option<LanguageClass>;
}

/// An annotation track that is the only unknown track in a file with an even
/// number of tracks: the other tracks pair up, so it takes the secondary language.
#[derive(Debug, Clone, Copy)]
pub struct SoleAnnotationTrack;

impl EliminationRule for SoleAnnotationTrack {
    fn name(&self) -> &'static str {
        "sole-annotation-track"
    }

    fn assign(&self, input: &EliminationInput<'_>) -> Option<LanguageClass> {
        let c = input.counts;
        let total = c.total();
        let unknown_subs = c.unknown(TrackType::Subtitles);

        let fires = input.is_annotation
            && total > 0
            && total % 2 == 0
            && c.unknown(TrackType::Audio) == 0
            && unknown_subs == 1
            && total - c.known() == unknown_subs;

        fires.then_some(LanguageClass::Secondary)
    }
}

/// One primary-language audio track, nothing else known, one unknown
/// subtitle: the subtitle is the translation.
///
/// Ignores `is_annotation`. Any input this rule accepts has two tracks and
/// one unknown subtitle, which [`SoleAnnotationTrack`] (listed first)
/// already takes when the track is an annotation track.
#[derive(Debug, Clone, Copy)]
pub struct SingleForeignAudio;

impl EliminationRule for SingleForeignAudio {
    fn name(&self) -> &'static str {
        "single-foreign-audio"
    }

    fn assign(&self, input: &EliminationInput<'_>) -> Option<LanguageClass> {
        let c = input.counts;
        let unknown_subs = c.unknown(TrackType::Subtitles);

        let fires = c.primary(TrackType::Audio) == 1
            && c.primary(TrackType::Subtitles) == 0
            && c.secondary(TrackType::Audio) == 0
            && c.secondary(TrackType::Subtitles) == 0
            && c.unknown(TrackType::Audio) == 0
            && unknown_subs == 1
            && c.total() - c.primary(TrackType::Audio) == unknown_subs;

        fires.then_some(LanguageClass::Secondary)
    }
}

/// Rules in evaluation order.
pub fn default_rules() -> Vec<Box<dyn EliminationRule>> {
    vec![Box::new(SoleAnnotationTrack), Box::new(SingleForeignAudio)]
}

/// A successful elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub language: String,
    pub class: LanguageClass,
    pub rule: &'static str,
}

/// Evaluates the rule list in order; the first rule that fires wins.
pub struct EliminationReasoner {
    pair: LanguagePair,
    rules: Vec<Box<dyn EliminationRule>>,
}

impl EliminationReasoner {
    pub fn new(pair: LanguagePair) -> Self {
        Self::with_rules(pair, default_rules())
    }

    pub fn with_rules(pair: LanguagePair, rules: Vec<Box<dyn EliminationRule>>) -> Self {
        Self { pair, rules }
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    /// Decide an unknown subtitle track by elimination, if possible.
    pub fn decide(&self, counts: &TrackLanguageCounts, is_annotation: bool) -> Option<Elimination> {
        let input = EliminationInput {
            counts,
            is_annotation,
        };

        self.rules.iter().find_map(|rule| {
            let class = rule.assign(&input)?;
            let language = self.pair.code_for(class)?.to_string();
            Some(Elimination {
                language,
                class,
                rule: rule.name(),
            })
        })
    }
}
