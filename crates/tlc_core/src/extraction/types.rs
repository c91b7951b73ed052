//! Error types for external tool operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::subtitles::SubtitleError;

/// Error type for probe, extraction, conversion and edit operations.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Input file not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to start an external tool.
    #[error("{tool} execution failed: {message}")]
    ToolExecutionFailed { tool: String, message: String },

    /// An external tool exited with a non-zero status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Failed to parse tool output.
    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// No extraction format is known for this codec.
    #[error("Unsupported subtitle codec '{0}'")]
    UnsupportedCodec(String),

    /// Output file missing or empty after a successful tool run.
    #[error("Output file missing or empty: {}", .0.display())]
    OutputMissing(PathBuf),

    /// The extracted subtitle file could not be read or parsed.
    #[error("Subtitle read failed: {0}")]
    Subtitle(#[from] SubtitleError),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;
