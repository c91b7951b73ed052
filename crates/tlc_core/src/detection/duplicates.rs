//! Duplicate-line disambiguation.
//!
//! Opening and ending songs, staff credits and signs repeat across every
//! episode of a release and across the tracks of one file. Those lines say
//! little about the track's language but can swamp a vote. When a vote is
//! weak but not hopeless, lines shared with other tracks are stripped and
//! the vote is run again on what is left.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use super::normalize::{NormalizedLine, TextNormalizer};
use super::oracle::ClassificationOracle;
use super::voting::{VoteResult, VotingAggregator};
use crate::config::DetectionSettings;
use crate::container::{ContainerReader, SubtitleSource};
use crate::extraction::ExtractionError;
use crate::models::Track;

/// Scratch label for comparison track extractions.
const COMPARISON_LABEL: &str = "lang_comparison";

/// Release group token of a file name: the text after the last hyphen,
/// without the `.mkv` extension, lowercased.
///
/// `"Show - 01 [1080p]-Group.mkv"` gives `"group"`.
pub fn release_group_token(file_name: &str) -> Option<String> {
    let (_, tail) = file_name.rsplit_once('-')?;

    let lower = tail.to_lowercase();
    let stem = lower
        .strip_suffix(".mkv")
        .or_else(|| lower.strip_suffix("-mkv"))
        .unwrap_or(&lower);
    let token = stem.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Other files of the same release: candidates whose name contains the
/// original's release group token. Sorted, without the original, at most
/// `limit` entries.
pub fn find_siblings(original: &Path, candidates: &[PathBuf], limit: usize) -> Vec<PathBuf> {
    let Some(token) = original
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(release_group_token)
    else {
        return Vec::new();
    };

    let original = without_cur_dir(original);
    let mut siblings: Vec<PathBuf> = candidates
        .iter()
        .filter(|c| without_cur_dir(c) != original)
        .filter(|c| {
            c.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_lowercase().contains(&token))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    siblings.sort();
    siblings.dedup();
    siblings.truncate(limit);
    siblings
}

/// `./ep01.mkv` and `ep01.mkv` name the same file.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components().filter(|c| *c != Component::CurDir).collect()
}

/// Remove every line that also appears in `comparison`, keeping order.
///
/// Returns the number of lines removed.
pub fn remove_shared_lines(lines: &mut Vec<NormalizedLine>, comparison: &[NormalizedLine]) -> usize {
    let shared: HashSet<&str> = comparison.iter().map(NormalizedLine::as_str).collect();
    let before = lines.len();
    lines.retain(|line| !shared.contains(line.as_str()));
    before - lines.len()
}

/// Collaborators needed to pull comparison tracks and re-vote.
#[derive(Clone, Copy)]
pub struct ComparisonTools<'a> {
    pub reader: &'a dyn ContainerReader,
    pub source: &'a dyn SubtitleSource,
    pub oracle: &'a dyn ClassificationOracle,
    pub normalizer: &'a TextNormalizer,
    pub aggregator: &'a VotingAggregator,
}

/// A comparison track or file that could not be used.
#[derive(Debug)]
pub struct ComparisonFailure {
    pub path: PathBuf,
    pub track_id: Option<usize>,
    pub error: ExtractionError,
}

/// What disambiguation found.
#[derive(Debug, Default)]
pub struct DisambiguationOutcome {
    /// First re-vote that reached the required percentage.
    pub conclusive: Option<VoteResult>,
    /// Most recent re-vote, conclusive or not.
    pub last_vote: Option<VoteResult>,
    /// Lines removed from the original set across all comparisons.
    pub lines_removed: usize,
    /// Comparison tracks successfully extracted.
    pub tracks_compared: usize,
    /// Classifier calls that failed during re-votes.
    pub oracle_failures: usize,
    pub failures: Vec<ComparisonFailure>,
}

/// Strips lines shared with the file's other subtitle tracks, then with
/// sibling files of the same release, re-voting after each comparison that
/// removed enough lines.
#[derive(Debug, Clone)]
pub struct DuplicateDisambiguator {
    floor_pct: f64,
    comparison_file_limit: usize,
    internal_image_cap: usize,
    sibling_image_cap: usize,
    min_duplicates_removed: usize,
}

impl Default for DuplicateDisambiguator {
    fn default() -> Self {
        Self::from_settings(&DetectionSettings::default())
    }
}

impl DuplicateDisambiguator {
    pub fn from_settings(settings: &DetectionSettings) -> Self {
        Self {
            floor_pct: settings.duplicate_floor_pct,
            comparison_file_limit: settings.comparison_file_limit,
            internal_image_cap: settings.internal_image_codec_cap,
            sibling_image_cap: settings.sibling_image_codec_cap,
            min_duplicates_removed: settings.min_duplicates_removed,
        }
    }

    pub fn comparison_file_limit(&self) -> usize {
        self.comparison_file_limit
    }

    /// A vote at or above the floor but below the required percentage.
    pub fn should_attempt(&self, result: &VoteResult, aggregator: &VotingAggregator) -> bool {
        let pct = result.support_percent();
        pct > 0.0 && pct >= self.floor_pct && !aggregator.is_conclusive(result)
    }

    /// Run the internal pass, then the sibling pass, stopping at the first
    /// conclusive re-vote. `lines` is reduced in place.
    pub fn disambiguate(
        &self,
        tools: ComparisonTools<'_>,
        path: &Path,
        track: &Track,
        file_tracks: &[Track],
        siblings: &[PathBuf],
        lines: &mut Vec<NormalizedLine>,
    ) -> DisambiguationOutcome {
        let mut outcome = DisambiguationOutcome::default();

        tracing::info!("Checking internal subtitle tracks for a comparison");
        let internal: Vec<&Track> = file_tracks
            .iter()
            .filter(|t| t.is_subtitle() && t.id != track.id)
            .collect();
        if self.compare_tracks(tools, path, &internal, self.internal_image_cap, lines, &mut outcome) {
            return outcome;
        }

        if siblings.is_empty() {
            tracing::info!("No comparison releases found for {}", path.display());
            return outcome;
        }

        for sibling in siblings.iter().take(self.comparison_file_limit) {
            tracing::info!("Comparing against {}", sibling.display());

            let tracks = match tools.reader.read_tracks(sibling) {
                Ok(tracks) => tracks,
                Err(error) => {
                    tracing::warn!("Could not read {}: {}", sibling.display(), error);
                    outcome.failures.push(ComparisonFailure {
                        path: sibling.clone(),
                        track_id: None,
                        error,
                    });
                    continue;
                }
            };

            let subtitle_tracks: Vec<&Track> = tracks.iter().filter(|t| t.is_subtitle()).collect();
            if self.compare_tracks(tools, sibling, &subtitle_tracks, self.sibling_image_cap, lines, &mut outcome) {
                return outcome;
            }
        }

        outcome
    }

    /// Compare against each track in turn. Returns true once a re-vote is conclusive.
    fn compare_tracks(
        &self,
        tools: ComparisonTools<'_>,
        path: &Path,
        tracks: &[&Track],
        image_cap: usize,
        lines: &mut Vec<NormalizedLine>,
        outcome: &mut DisambiguationOutcome,
    ) -> bool {
        let mut image_count = 0;

        for comparison in tracks {
            if comparison.is_image_based() {
                image_count += 1;
                if image_count > image_cap {
                    tracing::debug!("Skipping {}, image subtitle limit reached", comparison.summary());
                    continue;
                }
            }

            if let Err(e) = tools.source.clear_scratch() {
                tracing::warn!("Failed to clear scratch folder: {}", e);
            }

            let raw = match tools.source.extract_lines(path, comparison, COMPARISON_LABEL) {
                Ok(raw) => raw,
                Err(error) => {
                    tracing::warn!(
                        "Comparison track {} of {} failed: {}",
                        comparison.id,
                        path.display(),
                        error
                    );
                    outcome.failures.push(ComparisonFailure {
                        path: path.to_path_buf(),
                        track_id: Some(comparison.id),
                        error,
                    });
                    continue;
                }
            };
            outcome.tracks_compared += 1;

            let comparison_lines = tools.normalizer.normalize_all(&raw);
            let removed = remove_shared_lines(lines, &comparison_lines);
            outcome.lines_removed += removed;

            if removed <= self.min_duplicates_removed {
                tracing::debug!("Not enough duplicates in {} ({} removed)", comparison.summary(), removed);
                continue;
            }

            tracing::info!("{} duplicate lines removed, retesting original", removed);
            let revote = tools.aggregator.vote(tools.oracle, lines);
            outcome.oracle_failures += revote.failures.len();
            let Some(result) = revote.result else {
                continue;
            };

            tracing::info!("Re-vote: {} at {:.1}%", result.label, result.support_percent());
            let conclusive = tools.aggregator.is_conclusive(&result);
            outcome.last_vote = Some(result.clone());
            if conclusive {
                outcome.conclusive = Some(result);
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<NormalizedLine> {
        TextNormalizer::default().normalize_all(raw)
    }

    #[test]
    fn release_group_from_file_name() {
        assert_eq!(release_group_token("Show - 01 [1080p]-Group.mkv").as_deref(), Some("group"));
        assert_eq!(release_group_token("Show.S01E01.1080p-SubsPlease.MKV").as_deref(), Some("subsplease"));
        assert_eq!(release_group_token("NoGroup.mkv"), None);
        assert_eq!(release_group_token("Trailing-.mkv"), None);
    }

    #[test]
    fn siblings_share_token_and_exclude_original() {
        let original = PathBuf::from("/anime/Show - 01-Group.mkv");
        let candidates = vec![
            PathBuf::from("/anime/Show - 04-Group.mkv"),
            original.clone(),
            PathBuf::from("/anime/Show - 02-GROUP.mkv"),
            PathBuf::from("/anime/Show - 03-Other.mkv"),
            PathBuf::from("/anime/Show - 05-Group.mkv"),
            PathBuf::from("/anime/Show - 06-Group.mkv"),
        ];

        let siblings = find_siblings(&original, &candidates, 3);
        assert_eq!(
            siblings,
            vec![
                PathBuf::from("/anime/Show - 02-GROUP.mkv"),
                PathBuf::from("/anime/Show - 04-Group.mkv"),
                PathBuf::from("/anime/Show - 05-Group.mkv"),
            ]
        );
    }

    #[test]
    fn original_is_excluded_when_listed_relative_to_working_directory() {
        let original = PathBuf::from("ep01-Group.mkv");
        let candidates = vec![PathBuf::from("./ep01-Group.mkv"), PathBuf::from("./ep02-Group.mkv")];

        assert_eq!(find_siblings(&original, &candidates, 3), vec![PathBuf::from("./ep02-Group.mkv")]);
    }

    #[test]
    fn remove_shared_lines_exact_match_only() {
        let mut original = lines(&["Opening song line", "Where are you going", "Opening song line!"]);
        let comparison = lines(&["Opening song line", "Something else here"]);

        // "Opening song line!" normalizes to the same text, so both go
        let removed = remove_shared_lines(&mut original, &comparison);
        assert_eq!(removed, 2);
        assert_eq!(original, lines(&["Where are you going"]));
    }

    #[test]
    fn remove_shared_lines_is_idempotent() {
        let mut original = lines(&["Shared credit line", "Unique line one", "Unique line two"]);
        let comparison = lines(&["Shared credit line"]);

        remove_shared_lines(&mut original, &comparison);
        let reduced = original.clone();
        assert_eq!(remove_shared_lines(&mut original, &comparison), 0);
        assert_eq!(original, reduced);
    }

    #[test]
    fn should_attempt_only_between_floor_and_threshold() {
        let d = DuplicateDisambiguator::default();
        let agg = VotingAggregator::new(70);
        let vote = |votes: usize| VoteResult {
            label: "eng".into(),
            votes,
            total_lines: 100,
            support_ratio: votes as f64 / 100.0,
        };

        assert!(d.should_attempt(&vote(12), &agg));
        assert!(d.should_attempt(&vote(10), &agg));
        assert!(!d.should_attempt(&vote(9), &agg));
        assert!(!d.should_attempt(&vote(70), &agg));
        assert!(!d.should_attempt(&vote(0), &agg));
    }
}
