//! MKVToolNix + SubtitleEdit implementation of the container traits.

use std::path::Path;

use super::{ContainerReader, ContainerWriter, ScratchArea, SubtitleSource};
use crate::extraction::{
    convert_to_srt, extension_for_codec, extract_track, probe_tracks, set_track_language,
    ExtractionError, ExtractionResult, SubtitleEditConverter,
};
use crate::models::Track;
use crate::subtitles;

/// Container access through `mkvmerge`, `mkvextract` and `mkvpropedit`.
///
/// Image subtitles (PGS, VobSub) are OCR'd to SRT with SubtitleEdit.
#[derive(Debug, Clone)]
pub struct MkvToolnix {
    scratch: ScratchArea,
    converter: SubtitleEditConverter,
}

impl MkvToolnix {
    pub fn new(scratch: ScratchArea, converter: SubtitleEditConverter) -> Self {
        Self { scratch, converter }
    }

    pub fn scratch(&self) -> &ScratchArea {
        &self.scratch
    }
}

impl ContainerReader for MkvToolnix {
    fn read_tracks(&self, path: &Path) -> ExtractionResult<Vec<Track>> {
        probe_tracks(path)
    }
}

impl ContainerWriter for MkvToolnix {
    fn set_language(&self, path: &Path, track: &Track, language: &str) -> ExtractionResult<()> {
        set_track_language(path, track.id, language)
    }
}

impl SubtitleSource for MkvToolnix {
    fn extract_lines(&self, path: &Path, track: &Track, label: &str) -> ExtractionResult<Vec<String>> {
        let extension = extension_for_codec(&track.codec)
            .ok_or_else(|| ExtractionError::UnsupportedCodec(track.codec.clone()))?;

        self.scratch.ensure()?;
        let output = self.scratch.file(label, extension);
        extract_track(path, track.id, &output)?;

        let text_file = if track.is_image_based() {
            tracing::info!("Converting {} to SRT with SubtitleEdit", output.display());
            convert_to_srt(&self.converter, &output)?
        } else {
            output
        };

        let data = subtitles::read_file(&text_file)?;
        let lines = subtitles::dialogue_lines(&data);
        tracing::debug!(
            "Read {} dialogue lines from track {} of {}",
            lines.len(),
            track.id,
            path.display()
        );

        Ok(lines)
    }

    fn clear_scratch(&self) -> std::io::Result<()> {
        self.scratch.clear()
    }
}
