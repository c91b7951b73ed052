//! Majority voting over per-line classifications.

use super::languages;
use super::normalize::NormalizedLine;
use super::oracle::{ClassificationOracle, OracleError};

/// Majority label of a batch and how much of the batch supports it.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteResult {
    /// Winning label, canonicalized to ISO 639-2/T where known.
    pub label: String,
    /// Lines classified as `label`.
    pub votes: usize,
    /// Cleaned lines in the batch, including ones the classifier failed on.
    pub total_lines: usize,
    /// `votes / total_lines`, in `[0, 1]`.
    pub support_ratio: f64,
}

impl VoteResult {
    /// Support as a percentage (0-100).
    pub fn support_percent(&self) -> f64 {
        self.support_ratio * 100.0
    }
}

/// A line the classifier could not handle.
#[derive(Debug, Clone)]
pub struct LineFailure {
    pub line: String,
    pub error: OracleError,
}

/// Everything a vote produced: the result, if any, plus per-line failures.
#[derive(Debug, Clone, Default)]
pub struct VoteOutcome {
    /// `None` when there were no cleaned lines or every line failed.
    pub result: Option<VoteResult>,
    pub failures: Vec<LineFailure>,
}

/// Runs the classifier over a batch and picks the majority label.
///
/// Ties go to the label seen first in line order.
#[derive(Debug, Clone, Copy)]
pub struct VotingAggregator {
    required_match_pct: u32,
}

impl Default for VotingAggregator {
    fn default() -> Self {
        Self {
            required_match_pct: 70,
        }
    }
}

impl VotingAggregator {
    pub fn new(required_match_pct: u32) -> Self {
        Self { required_match_pct }
    }

    pub fn required_match_pct(&self) -> u32 {
        self.required_match_pct
    }

    /// Whether a result is strong enough to act on.
    pub fn is_conclusive(&self, result: &VoteResult) -> bool {
        // Integer form avoids float rounding right at the threshold
        result.votes * 100 >= self.required_match_pct as usize * result.total_lines
    }

    /// Classify every line and tally the labels.
    pub fn vote<O: ClassificationOracle + ?Sized>(
        &self,
        oracle: &O,
        lines: &[NormalizedLine],
    ) -> VoteOutcome {
        let mut outcome = VoteOutcome::default();
        if lines.is_empty() {
            return outcome;
        }

        // Insertion-ordered tally
        let mut tally: Vec<(String, usize)> = Vec::new();
        for (line, result) in lines.iter().zip(oracle.classify_batch(lines)) {
            match result {
                Ok(classification) => {
                    let label = languages::standardize(&classification.label);
                    match tally.iter_mut().find(|(l, _)| *l == label) {
                        Some((_, count)) => *count += 1,
                        None => tally.push((label, 1)),
                    }
                }
                Err(error) => {
                    tracing::debug!("Classification failed for '{}': {}", line, error);
                    outcome.failures.push(LineFailure {
                        line: line.to_string(),
                        error,
                    });
                }
            }
        }

        let mut best: Option<(String, usize)> = None;
        for (label, count) in tally {
            if best.as_ref().map_or(true, |(_, c)| count > *c) {
                best = Some((label, count));
            }
        }

        outcome.result = best.map(|(label, votes)| VoteResult {
            label,
            votes,
            total_lines: lines.len(),
            support_ratio: votes as f64 / lines.len() as f64,
        });

        outcome
    }
}
