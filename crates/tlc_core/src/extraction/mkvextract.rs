//! mkvextract wrapper for pulling a single subtitle track out of a file.

use std::path::Path;
use std::process::Command;

use super::types::{ExtractionError, ExtractionResult};
use super::run_tool;

/// Extract a single track from an MKV file.
///
/// # Arguments
/// * `input_path` - Path to the source MKV file
/// * `track_id` - Track ID to extract
/// * `output_path` - Path where the track will be written
///
/// Fails with `OutputMissing` if mkvextract exits cleanly but writes nothing.
pub fn extract_track(input_path: &Path, track_id: usize, output_path: &Path) -> ExtractionResult<()> {
    if !input_path.exists() {
        return Err(ExtractionError::FileNotFound(input_path.to_path_buf()));
    }

    let track_spec = format!("{}:{}", track_id, output_path.display());

    let mut cmd = Command::new("mkvextract");
    cmd.arg(input_path).arg("tracks").arg(&track_spec);
    run_tool("mkvextract", &mut cmd)?;

    let written = output_path
        .metadata()
        .map(|m| m.len() > 0)
        .unwrap_or(false);
    if !written {
        return Err(ExtractionError::OutputMissing(output_path.to_path_buf()));
    }

    tracing::info!(
        "Extracted track {} from {} to {}",
        track_id,
        input_path.display(),
        output_path.display()
    );

    Ok(())
}

/// Get the file extension to extract a subtitle codec into.
///
/// Accepts both mkvmerge codec names ("SubStationAlpha", "HDMV PGS") and
/// Matroska codec IDs ("S_TEXT/ASS"). Returns `None` for codecs the
/// corrector cannot turn into text.
pub fn extension_for_codec(codec: &str) -> Option<&'static str> {
    let codec = codec.to_lowercase();

    if codec.contains("substationalpha") || codec == "s_text/ass" || codec == "s_text/ssa" {
        Some("ass")
    } else if codec.contains("subrip") || codec == "s_text/utf8" || codec == "s_text/ascii" {
        Some("srt")
    } else if codec.contains("webvtt") {
        Some("vtt")
    } else if codec.contains("pgs") {
        Some("sup")
    } else if codec.contains("vobsub") {
        Some("sub")
    } else {
        None
    }
}
