//! Subtitle reading for language inference.
//!
//! Extracted tracks arrive as SRT, ASS or WebVTT text. This module reads
//! them into ordered events and flattens those into plain dialogue lines,
//! with styling markup removed.

mod error;
pub mod parsers;
mod types;

pub use error::{ParseError, SubtitleError};
pub use types::{SubtitleData, SubtitleEvent, SubtitleFormat};

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// `{\i1}` style override blocks (ASS).
static OVERRIDE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// `<i>`, `<font ...>`, `<c.yellow>` style tags (SRT / WebVTT).
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Read and parse a subtitle file.
///
/// The format comes from the extension when it is known, otherwise from
/// the content. Invalid UTF-8 is decoded lossily; a leading BOM is dropped.
pub fn read_file(path: &Path) -> Result<SubtitleData, SubtitleError> {
    let bytes = std::fs::read(path).map_err(|e| SubtitleError::read(path, e))?;
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    parsers::parse_content(content, SubtitleFormat::from_extension(path))
        .map_err(|e| SubtitleError::parse(path, e))
}

/// Flatten dialogue events into plain text lines.
///
/// Comments are skipped, markup is stripped and hard line breaks become
/// spaces. Lines that end up empty are dropped.
pub fn dialogue_lines(data: &SubtitleData) -> Vec<String> {
    data.events
        .iter()
        .filter(|e| !e.is_comment)
        .map(|e| strip_markup(&e.text))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Remove markup from a single event's text.
pub fn strip_markup(text: &str) -> String {
    let text = OVERRIDE_BLOCK.replace_all(text, "");
    let text = MARKUP_TAG.replace_all(&text, "");
    let text = text
        .replace("\\N", " ")
        .replace("\\n", " ")
        .replace("\\h", " ")
        .replace('\n', " ");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
