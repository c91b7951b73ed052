//! Core subtitle types.
//!
//! Only what language inference needs is kept: the ordered timed text
//! entries of a file. Styles and script metadata are skipped while parsing.

/// Supported subtitle formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtitleFormat {
    /// Advanced SubStation Alpha (.ass, .ssa)
    Ass,
    /// SubRip (.srt)
    #[default]
    Srt,
    /// WebVTT (.vtt)
    WebVtt,
}

impl SubtitleFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "ass" | "ssa" => Some(Self::Ass),
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::WebVtt),
            _ => None,
        }
    }
}

/// Parsed subtitle file.
#[derive(Debug, Clone, Default)]
pub struct SubtitleData {
    /// Subtitle events in file order.
    pub events: Vec<SubtitleEvent>,
    /// Format the data was parsed from.
    pub format: SubtitleFormat,
}

impl SubtitleData {
    /// Create with specified format.
    pub fn with_format(format: SubtitleFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Number of dialogue events (excluding comments).
    pub fn dialogue_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_comment).count()
    }
}

/// A single timed subtitle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    /// Start time in milliseconds.
    pub start_ms: f64,
    /// End time in milliseconds.
    pub end_ms: f64,
    /// Raw text, including any markup.
    pub text: String,
    /// ASS `Comment:` line (never displayed).
    pub is_comment: bool,
}

impl SubtitleEvent {
    /// Create a dialogue event.
    pub fn new(start_ms: f64, end_ms: f64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
            is_comment: false,
        }
    }
}
