//! Subtitle error types.

use std::path::PathBuf;

/// Errors that can occur while reading an extracted subtitle file.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to read subtitle file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown or unsupported subtitle format.
    #[error("Unknown subtitle format for file '{0}'")]
    UnknownFormat(PathBuf),

    /// Parse error.
    #[error("Parse error in '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Errors that can occur during subtitle parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Invalid or malformed time format.
    #[error("Invalid time format at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },

    /// Invalid event/dialogue line.
    #[error("Invalid event at line {line}: {message}")]
    InvalidEvent { line: usize, message: String },
}

impl SubtitleError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Wrap a parse error with the file it came from.
    pub fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::ParseError {
            path: path.into(),
            source,
        }
    }
}

impl ParseError {
    /// Create an invalid time error.
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }

    /// Create an invalid event error.
    pub fn invalid_event(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            line,
            message: message.into(),
        }
    }
}
