//! Decisions produced while evaluating a single track.

use serde::{Deserialize, Serialize};

use super::enums::EvidenceKind;

/// How sure the controller is about a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "percent")]
pub enum Confidence {
    /// Keyword and elimination decisions.
    Certain,
    /// Classifier support, as a percentage in 0..=100.
    Support(f64),
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Certain => write!(f, "certain"),
            Confidence::Support(pct) => write!(f, "{:.1}%", pct),
        }
    }
}

/// A proposed language change for one track.
///
/// Produced and consumed within one track's evaluation; only the resulting
/// change record outlives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Track ID within the file.
    pub track_id: usize,
    /// Language code to write (ISO 639-2 where known).
    pub proposed_language: String,
    /// The signal that produced the decision.
    pub evidence: EvidenceKind,
    /// Confidence of the decision.
    pub confidence: Confidence,
}

impl Decision {
    /// Create a decision with certain confidence.
    pub fn certain(track_id: usize, language: impl Into<String>, evidence: EvidenceKind) -> Self {
        Self {
            track_id,
            proposed_language: language.into(),
            evidence,
            confidence: Confidence::Certain,
        }
    }

    /// Create a decision backed by classifier support.
    pub fn supported(
        track_id: usize,
        language: impl Into<String>,
        evidence: EvidenceKind,
        percent: f64,
    ) -> Self {
        Self {
            track_id,
            proposed_language: language.into(),
            evidence,
            confidence: Confidence::Support(percent),
        }
    }
}
