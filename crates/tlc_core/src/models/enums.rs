//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Type of media track that takes part in language inference.
///
/// Video and other track kinds are ignored when reading a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Subtitles,
}

impl TrackType {
    /// Parse the mkvmerge track type string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "audio" => Some(Self::Audio),
            "subtitles" => Some(Self::Subtitles),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackType::Audio => write!(f, "audio"),
            TrackType::Subtitles => write!(f, "subtitles"),
        }
    }
}

/// Which side of the expected language pair a track's declared language is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageClass {
    /// Original-language content (conventionally "jpn").
    Primary,
    /// Translation / dub language (conventionally "eng").
    Secondary,
    /// Anything else, including "und" and "zxx".
    Unknown,
}

/// The signal that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    /// Language name or code found in the track name.
    Keyword,
    /// Forced by the known track counts of the file.
    Elimination,
    /// Majority vote of the text classifier.
    Classification,
    /// Majority vote after stripping lines shared with a comparison track.
    DuplicateAssisted,
}

impl EvidenceKind {
    /// Get the display name for this evidence kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Elimination => "elimination",
            Self::Classification => "classification",
            Self::DuplicateAssisted => "duplicate-assisted",
        }
    }
}

impl std::fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
