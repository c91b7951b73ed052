//! Error types for the per-file and per-track isolation boundaries.
//!
//! A `TrackError` ends evaluation of one track; a `FileError` skips one
//! file. Neither ever stops the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::report::IssueKind;
use crate::extraction::ExtractionError;

/// Failure while evaluating one track.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Extracting or converting the track's subtitles failed.
    #[error("Track {track_id}: extraction failed: {source}")]
    Extraction {
        track_id: usize,
        #[source]
        source: ExtractionError,
    },

    /// The container writer rejected the language change.
    #[error("Track {track_id}: failed to set language to '{language}': {source}")]
    Write {
        track_id: usize,
        language: String,
        #[source]
        source: ExtractionError,
    },

    /// The track needs a name for the only signal that applies to it.
    #[error("Track {track_id}: track name is empty, a name is required to detect {what}")]
    MissingName { track_id: usize, what: &'static str },

    /// Every classification call for the track failed.
    #[error("Track {track_id}: classifier failed on all {lines} lines: {message}")]
    Classifier {
        track_id: usize,
        lines: usize,
        message: String,
    },

    /// The scratch folder could not be cleared.
    #[error("Track {track_id}: scratch folder error: {source}")]
    Scratch {
        track_id: usize,
        #[source]
        source: io::Error,
    },
}

impl TrackError {
    pub fn extraction(track_id: usize, source: ExtractionError) -> Self {
        Self::Extraction { track_id, source }
    }

    pub fn write(track_id: usize, language: impl Into<String>, source: ExtractionError) -> Self {
        Self::Write {
            track_id,
            language: language.into(),
            source,
        }
    }

    pub fn missing_name(track_id: usize, what: &'static str) -> Self {
        Self::MissingName { track_id, what }
    }

    /// ID of the track the error belongs to.
    pub fn track_id(&self) -> usize {
        match self {
            Self::Extraction { track_id, .. }
            | Self::Write { track_id, .. }
            | Self::MissingName { track_id, .. }
            | Self::Classifier { track_id, .. }
            | Self::Scratch { track_id, .. } => *track_id,
        }
    }

    /// Where this error falls in the report's issue taxonomy.
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::MissingName { .. } => IssueKind::Input,
            Self::Classifier { .. } => IssueKind::Oracle,
            Self::Extraction { .. } | Self::Write { .. } | Self::Scratch { .. } => IssueKind::Tool,
        }
    }
}

/// Failure that skips a whole file.
#[derive(Error, Debug)]
pub enum FileError {
    /// The container could not be read (missing, unsupported, corrupt).
    #[error("Could not read '{path}' (is MKVToolNix installed?): {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ExtractionError,
    },
}

impl FileError {
    pub fn read(path: impl Into<PathBuf>, source: ExtractionError) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> IssueKind {
        IssueKind::Input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_error_kinds() {
        let missing = TrackError::missing_name(1, "audio language");
        assert_eq!(missing.kind(), IssueKind::Input);
        assert_eq!(missing.track_id(), 1);

        let tool = TrackError::extraction(
            3,
            ExtractionError::CommandFailed {
                tool: "mkvextract".into(),
                exit_code: 2,
                message: "boom".into(),
            },
        );
        assert_eq!(tool.kind(), IssueKind::Tool);
        assert!(tool.to_string().contains("mkvextract"));
    }

    #[test]
    fn file_error_chains_source() {
        let err = FileError::read("/a.mkv", ExtractionError::FileNotFound("/a.mkv".into()));
        assert_eq!(err.kind(), IssueKind::Input);
        assert!(std::error::Error::source(&err).is_some());
    }
}
