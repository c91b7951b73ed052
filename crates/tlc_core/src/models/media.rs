//! Track records as read from a media container.

use serde::{Deserialize, Serialize};

use super::enums::TrackType;

/// A single audio or subtitle track within a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track ID within the container (mkvmerge numbering, 0-based).
    pub id: usize,
    /// Type of track.
    #[serde(rename = "type")]
    pub track_type: TrackType,
    /// Declared language tag ("und" when the container has none).
    pub language: String,
    /// Track name/title, if set.
    #[serde(default)]
    pub name: Option<String>,
    /// Codec string as reported by mkvmerge (e.g. "SubStationAlpha", "HDMV PGS").
    pub codec: String,
    /// Forced display flag.
    #[serde(default)]
    pub forced: bool,
}

impl Track {
    /// Create a new track with no name.
    pub fn new(
        id: usize,
        track_type: TrackType,
        language: impl Into<String>,
        codec: impl Into<String>,
    ) -> Self {
        Self {
            id,
            track_type,
            language: language.into(),
            name: None,
            codec: codec.into(),
            forced: false,
        }
    }

    /// Set the track name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this is a subtitle track.
    pub fn is_subtitle(&self) -> bool {
        self.track_type == TrackType::Subtitles
    }

    /// Whether the subtitle codec is bitmap based and needs OCR to become text.
    ///
    /// These are the expensive extractions that comparison passes cap.
    pub fn is_image_based(&self) -> bool {
        let codec = self.codec.to_lowercase();
        codec.contains("pgs") || codec.contains("vobsub")
    }

    /// The mkvpropedit track selector number (1-based).
    pub fn edit_number(&self) -> usize {
        self.id + 1
    }

    /// Short description used in log and report lines.
    pub fn summary(&self) -> String {
        let name = self
            .name
            .as_ref()
            .map(|n| format!(" '{}'", n))
            .unwrap_or_default();
        format!(
            "Track {} [{}] {} ({}){}",
            self.id, self.track_type, self.codec, self.language, name
        )
    }
}
