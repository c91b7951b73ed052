//! Per-track decision state machine.
//!
//! Each track walks the signals in priority order and stops at the first
//! one that decides it:
//!
//! ```text
//! Unevaluated -> KeywordChecked -> EliminationChecked -> ClassificationAttempted
//!     -> [DuplicateAttempted] -> Decided(write | no-write)
//! ```
//!
//! Tracks are evaluated in file order. Every write updates the file's
//! [`TrackLanguageCounts`] before the next track is looked at, so an
//! earlier decision can make a later track decidable by elimination.

use std::path::{Path, PathBuf};

use super::errors::{FileError, TrackError};
use super::report::{ChangeRecord, Issue, IssueKind, Reporter};
use crate::config::Settings;
use crate::container::{ContainerReader, ContainerWriter, SubtitleSource};
use crate::detection::duplicates::ComparisonFailure;
use crate::detection::{
    find_siblings, languages, ClassificationOracle, ComparisonTools, DuplicateDisambiguator,
    EliminationReasoner, KeywordMatcher, LanguagePair, NormalizedLine, TextNormalizer,
    TrackLanguageCounts, VoteResult, VotingAggregator,
};
use crate::logging::MessagePrefix;
use crate::models::{Decision, EvidenceKind, Track, TrackType};

/// Scratch label for the track under evaluation.
const TEST_LABEL: &str = "lang_test";

/// External collaborators the controller drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub reader: &'a dyn ContainerReader,
    pub writer: &'a dyn ContainerWriter,
    pub source: &'a dyn SubtitleSource,
    pub oracle: &'a dyn ClassificationOracle,
}

/// Furthest step a track reached before it was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrackState {
    Unevaluated,
    KeywordChecked,
    EliminationChecked,
    ClassificationAttempted,
    DuplicateAttempted,
}

/// Terminal result for one track.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// A language change to write.
    Write(Decision),
    /// A signal agreed with the declared language.
    AlreadyCorrect { language: String, evidence: EvidenceKind },
    /// Every signal was exhausted without a confident answer.
    Unresolved {
        message: String,
        vote: Option<VoteResult>,
    },
}

/// Everything one track's evaluation produced.
#[derive(Debug)]
pub struct TrackEvaluation {
    pub state: TrackState,
    pub outcome: TrackOutcome,
    /// Normalized lines the final vote was taken on (after any duplicate removal).
    pub lines: Vec<NormalizedLine>,
    /// Failed classifier calls, across the first vote and any re-votes.
    pub oracle_failures: usize,
    /// Comparison tracks or files that could not be used.
    pub comparison_failures: Vec<ComparisonFailure>,
}

impl TrackEvaluation {
    fn decided(state: TrackState, outcome: TrackOutcome) -> Self {
        Self {
            state,
            outcome,
            lines: Vec::new(),
            oracle_failures: 0,
            comparison_failures: Vec::new(),
        }
    }
}

fn advance(track: &Track, state: &mut TrackState, next: TrackState) {
    tracing::trace!("Track {}: {:?} -> {:?}", track.id, state, next);
    *state = next;
}

/// Runs the signals for every track of a file and applies the decisions.
pub struct DecisionController<'a> {
    tools: Collaborators<'a>,
    normalizer: TextNormalizer,
    aggregator: VotingAggregator,
    keywords: KeywordMatcher,
    eliminator: EliminationReasoner,
    disambiguator: DuplicateDisambiguator,
    languages_to_check: Vec<String>,
}

impl<'a> DecisionController<'a> {
    pub fn new(settings: &Settings, tools: Collaborators<'a>) -> Self {
        let detection = &settings.detection;
        let langs = &settings.languages;

        Self {
            tools,
            normalizer: TextNormalizer::new(detection.min_line_length),
            aggregator: VotingAggregator::new(detection.required_match_pct),
            keywords: KeywordMatcher::new(
                &langs.keyword_candidates,
                &langs.annotation_keywords,
                langs.match_two_letter_codes,
            ),
            eliminator: EliminationReasoner::new(LanguagePair::new(&langs.primary, &langs.secondary)),
            disambiguator: DuplicateDisambiguator::from_settings(detection),
            languages_to_check: detection
                .languages_to_check
                .iter()
                .map(|l| languages::standardize(l))
                .collect(),
        }
    }

    fn pair(&self) -> &LanguagePair {
        self.eliminator.pair()
    }

    /// Whether a declared language marks the track for inference.
    pub fn needs_check(&self, language: &str) -> bool {
        let language = languages::standardize(language);
        self.languages_to_check.iter().any(|l| *l == language)
    }

    /// Evaluate every track of `path` in order, writing decisions as they
    /// are made. `sibling_candidates` are the files considered for
    /// duplicate comparison.
    pub fn process_file(
        &self,
        path: &Path,
        sibling_candidates: &[PathBuf],
        reporter: &mut Reporter<'_>,
    ) -> Result<(), FileError> {
        let mut tracks = self
            .tools
            .reader
            .read_tracks(path)
            .map_err(|e| FileError::read(path, e))?;
        let mut counts = TrackLanguageCounts::from_tracks(&tracks, self.pair());

        tracing::debug!("{} audio/subtitle tracks in {}", tracks.len(), path.display());

        for idx in 0..tracks.len() {
            if !self.needs_check(&tracks[idx].language) {
                tracing::trace!("Skipping {}", tracks[idx].summary());
                continue;
            }

            reporter.note(MessagePrefix::None, &tracks[idx].summary());

            let result = self
                .evaluate_track(path, &tracks, idx, &counts, sibling_candidates)
                .and_then(|evaluation| {
                    self.report_side_issues(path, &tracks[idx], &evaluation, reporter);
                    self.finish_track(path, &mut tracks[idx], &mut counts, evaluation, reporter)
                });

            if let Err(e) = result {
                reporter.issue(Issue::new(path, Some(e.track_id()), e.kind(), e.to_string()));
            }
        }

        Ok(())
    }

    /// Walk the signals for `tracks[idx]`. Pure apart from extraction and
    /// classification calls: nothing is written.
    pub fn evaluate_track(
        &self,
        path: &Path,
        tracks: &[Track],
        idx: usize,
        counts: &TrackLanguageCounts,
        sibling_candidates: &[PathBuf],
    ) -> Result<TrackEvaluation, TrackError> {
        let track = &tracks[idx];
        let mut state = TrackState::Unevaluated;

        // Keyword
        match track.name.as_deref() {
            Some(name) => {
                if let Some(found) = self.keywords.find_language(name) {
                    tracing::info!("'{}' keyword found in track name", found.matched);
                    let outcome = if languages::same_language(&found.code, &track.language) {
                        TrackOutcome::AlreadyCorrect {
                            language: found.code,
                            evidence: EvidenceKind::Keyword,
                        }
                    } else {
                        TrackOutcome::Write(Decision::certain(track.id, found.code, EvidenceKind::Keyword))
                    };
                    return Ok(TrackEvaluation::decided(state, outcome));
                }
            }
            None if track.track_type == TrackType::Audio => {
                return Err(TrackError::missing_name(track.id, "an audio language"));
            }
            None => tracing::debug!("Track {} has no name, skipping keyword check", track.id),
        }
        advance(track, &mut state, TrackState::KeywordChecked);

        // Audio is only ever decided by name
        if track.track_type == TrackType::Audio {
            let outcome = TrackOutcome::Unresolved {
                message: "No language keyword found in audio track name".to_string(),
                vote: None,
            };
            return Ok(TrackEvaluation::decided(state, outcome));
        }

        // Elimination
        let is_annotation = track
            .name
            .as_deref()
            .map(|n| self.keywords.is_annotation(n))
            .unwrap_or(false);
        if is_annotation {
            tracing::debug!("Track name contains an annotation keyword");
        }
        if let Some(elimination) = self.eliminator.decide(counts, is_annotation) {
            tracing::info!(
                "Track determined to be '{}' through process of elimination ({})",
                elimination.language,
                elimination.rule
            );
            let decision = Decision::certain(track.id, elimination.language, EvidenceKind::Elimination);
            return Ok(TrackEvaluation::decided(state, TrackOutcome::Write(decision)));
        }
        advance(track, &mut state, TrackState::EliminationChecked);
        tracing::debug!("Language could not be determined through process of elimination");

        // Classification
        self.tools
            .source
            .clear_scratch()
            .map_err(|source| TrackError::Scratch {
                track_id: track.id,
                source,
            })?;
        let raw = self
            .tools
            .source
            .extract_lines(path, track, TEST_LABEL)
            .map_err(|e| TrackError::extraction(track.id, e))?;
        let mut lines = self.normalizer.normalize_all(&raw);
        advance(track, &mut state, TrackState::ClassificationAttempted);

        let vote = self.aggregator.vote(self.tools.oracle, &lines);
        let oracle_failures = vote.failures.len();

        let Some(result) = vote.result else {
            if let Some(first) = vote.failures.first() {
                return Err(TrackError::Classifier {
                    track_id: track.id,
                    lines: lines.len(),
                    message: first.error.to_string(),
                });
            }
            let outcome = TrackOutcome::Unresolved {
                message: format!("No usable dialogue lines ({} raw lines)", raw.len()),
                vote: None,
            };
            return Ok(TrackEvaluation::decided(state, outcome));
        };

        tracing::info!(
            "Classified as '{}' at {:.1}% ({}/{} lines)",
            result.label,
            result.support_percent(),
            result.votes,
            result.total_lines
        );

        let mut evaluation = TrackEvaluation {
            state,
            outcome: TrackOutcome::Unresolved {
                message: String::new(),
                vote: None,
            },
            lines: Vec::new(),
            oracle_failures,
            comparison_failures: Vec::new(),
        };

        if self.aggregator.is_conclusive(&result) {
            evaluation.outcome = self.outcome_for_vote(track, result, EvidenceKind::Classification);
            evaluation.lines = lines;
            return Ok(evaluation);
        }

        if !self.disambiguator.should_attempt(&result, &self.aggregator) {
            evaluation.outcome = self.below_threshold(result);
            evaluation.lines = lines;
            return Ok(evaluation);
        }

        // Duplicate-assisted
        advance(track, &mut evaluation.state, TrackState::DuplicateAttempted);
        let siblings = find_siblings(
            path,
            sibling_candidates,
            self.disambiguator.comparison_file_limit(),
        );
        let comparison = ComparisonTools {
            reader: self.tools.reader,
            source: self.tools.source,
            oracle: self.tools.oracle,
            normalizer: &self.normalizer,
            aggregator: &self.aggregator,
        };
        let found = self
            .disambiguator
            .disambiguate(comparison, path, track, tracks, &siblings, &mut lines);

        evaluation.comparison_failures = found.failures;
        evaluation.oracle_failures += found.oracle_failures;
        evaluation.outcome = match found.conclusive {
            Some(result) => self.outcome_for_vote(track, result, EvidenceKind::DuplicateAssisted),
            None => self.below_threshold(found.last_vote.unwrap_or(result)),
        };
        evaluation.lines = lines;

        Ok(evaluation)
    }

    /// Outcome for a conclusive vote.
    fn outcome_for_vote(&self, track: &Track, result: VoteResult, evidence: EvidenceKind) -> TrackOutcome {
        if languages::same_language(&result.label, &track.language) {
            TrackOutcome::AlreadyCorrect {
                language: result.label,
                evidence,
            }
        } else {
            let pct = result.support_percent();
            TrackOutcome::Write(Decision::supported(track.id, result.label, evidence, pct))
        }
    }

    fn below_threshold(&self, result: VoteResult) -> TrackOutcome {
        TrackOutcome::Unresolved {
            message: format!(
                "Subtitle match below {}%, no match found (best '{}' at {:.1}%)",
                self.aggregator.required_match_pct(),
                result.label,
                result.support_percent()
            ),
            vote: Some(result),
        }
    }

    /// Report classifier and comparison failures that did not end the track.
    fn report_side_issues(
        &self,
        path: &Path,
        track: &Track,
        evaluation: &TrackEvaluation,
        reporter: &mut Reporter<'_>,
    ) {
        if evaluation.oracle_failures > 0 {
            reporter.issue(Issue::new(
                path,
                Some(track.id),
                IssueKind::Oracle,
                format!("Classifier failed on {} line(s) across all votes", evaluation.oracle_failures),
            ));
        }

        for failure in &evaluation.comparison_failures {
            let message = match failure.track_id {
                Some(id) => format!(
                    "Comparison track {} of {} skipped: {}",
                    id,
                    failure.path.display(),
                    failure.error
                ),
                None => format!("Comparison file {} skipped: {}", failure.path.display(), failure.error),
            };
            reporter.issue(Issue::new(path, Some(track.id), IssueKind::Tool, message));
        }
    }

    /// Apply a terminal outcome: write, note, or report as unresolved.
    fn finish_track(
        &self,
        path: &Path,
        track: &mut Track,
        counts: &mut TrackLanguageCounts,
        evaluation: TrackEvaluation,
        reporter: &mut Reporter<'_>,
    ) -> Result<(), TrackError> {
        match evaluation.outcome {
            TrackOutcome::Write(decision) => self.apply(path, track, counts, decision, reporter),
            TrackOutcome::AlreadyCorrect { language, evidence } => {
                reporter.note(
                    MessagePrefix::None,
                    &format!("Track {}: correct language '{}' already set ({})", track.id, language, evidence),
                );
                Ok(())
            }
            TrackOutcome::Unresolved { message, .. } => {
                reporter.issue(Issue::new(path, Some(track.id), IssueKind::Inconclusive, message));
                Ok(())
            }
        }
    }

    /// Write a decision and bring the counts up to date.
    fn apply(
        &self,
        path: &Path,
        track: &mut Track,
        counts: &mut TrackLanguageCounts,
        decision: Decision,
        reporter: &mut Reporter<'_>,
    ) -> Result<(), TrackError> {
        let language = decision.proposed_language;
        self.tools
            .writer
            .set_language(path, track, &language)
            .map_err(|e| TrackError::write(track.id, language.clone(), e))?;

        let from = std::mem::replace(&mut track.language, language.clone());
        counts.reassign(
            track.track_type,
            self.pair().classify(&from),
            self.pair().classify(&language),
        );

        reporter.change(ChangeRecord {
            path: path.to_path_buf(),
            track_id: track.id,
            track_type: track.track_type,
            from_language: from,
            to_language: language,
            evidence: decision.evidence,
            confidence: decision.confidence,
        });

        Ok(())
    }
}
