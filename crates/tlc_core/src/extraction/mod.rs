//! External tool wrappers for reading and editing Matroska files.
//!
//! This module wraps the command line tools the corrector depends on:
//!
//! - **Probe**: `mkvmerge -J` to read the track list
//! - **Track Extraction**: `mkvextract tracks` into the scratch area
//! - **Conversion**: SubtitleEdit OCR of image subtitles (PGS, VobSub) to SRT
//! - **Language Edit**: `mkvpropedit --set language=` on a single track
//!
//! Every wrapper is synchronous and blocking. A non-zero exit status is
//! reported as [`ExtractionError::CommandFailed`] with the tool's stderr.
//!
//! # Usage
//!
//! ```ignore
//! use tlc_core::extraction::{probe_tracks, extract_track, set_track_language};
//!
//! let tracks = probe_tracks(Path::new("/anime/Show - 01-Group.mkv"))?;
//! extract_track(path, 2, Path::new("/tmp/subs_test/lang_test.ass"))?;
//! set_track_language(path, 3, "eng")?;
//! ```

mod convert;
mod mkvextract;
mod probe;
mod propedit;
mod types;

// Re-export public types
pub use types::{ExtractionError, ExtractionResult};

// Re-export public functions
pub use convert::{convert_to_srt, SubtitleEditConverter};
pub use mkvextract::{extension_for_codec, extract_track};
pub use probe::{parse_probe_json, probe_tracks};
pub use propedit::set_track_language;

use std::process::{Command, Output};

/// Run a prepared command, mapping spawn failures and non-zero exits.
pub(crate) fn run_tool(tool: &str, cmd: &mut Command) -> ExtractionResult<Output> {
    tracing::debug!("Running: {:?}", cmd);

    let output = cmd.output().map_err(|e| ExtractionError::ToolExecutionFailed {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // mkvtoolnix reports most errors on stdout
        let message = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(ExtractionError::CommandFailed {
            tool: tool.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message,
        });
    }

    Ok(output)
}
