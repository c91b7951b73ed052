//! Boundaries to the media container tools.
//!
//! The decision engine only talks to containers through these traits:
//! reading track lists, writing a language tag and pulling dialogue lines
//! out of a subtitle track. [`MkvToolnix`] implements all three with the
//! MKVToolNix command line tools and SubtitleEdit.

mod mkvtoolnix;
mod scratch;

pub use mkvtoolnix::MkvToolnix;
pub use scratch::ScratchArea;

use std::path::Path;

use crate::extraction::ExtractionResult;
use crate::models::Track;

/// Reads the ordered audio and subtitle tracks of a file.
pub trait ContainerReader {
    fn read_tracks(&self, path: &Path) -> ExtractionResult<Vec<Track>>;
}

/// Writes a language tag to one track of a file.
///
/// A write only counts as done when this returns `Ok`.
pub trait ContainerWriter {
    fn set_language(&self, path: &Path, track: &Track, language: &str) -> ExtractionResult<()>;
}

/// Extracts a subtitle track and returns its raw dialogue lines.
pub trait SubtitleSource {
    /// `label` names the scratch file (e.g. "lang_test", "lang_comparison").
    fn extract_lines(&self, path: &Path, track: &Track, label: &str) -> ExtractionResult<Vec<String>>;

    /// Remove every leftover file from earlier extractions.
    fn clear_scratch(&self) -> std::io::Result<()> {
        Ok(())
    }
}
