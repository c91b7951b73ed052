//! mkvpropedit wrapper for rewriting a track's language in place.

use std::path::Path;
use std::process::Command;

use super::types::{ExtractionError, ExtractionResult};
use super::run_tool;

/// Set the language of one track.
///
/// `track_id` is the 0-based mkvmerge ID; mkvpropedit's `track:N` selector is
/// 1-based, so `N = track_id + 1`.
pub fn set_track_language(path: &Path, track_id: usize, language: &str) -> ExtractionResult<()> {
    if !path.exists() {
        return Err(ExtractionError::FileNotFound(path.to_path_buf()));
    }

    let mut cmd = Command::new("mkvpropedit");
    cmd.arg(path)
        .arg("--edit")
        .arg(format!("track:{}", track_id + 1))
        .arg("--set")
        .arg(format!("language={}", language));
    run_tool("mkvpropedit", &mut cmd)?;

    tracing::info!(
        "Set track {} of {} to {}",
        track_id + 1,
        path.display(),
        language
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_file_error() {
        let result = set_track_language(Path::new("/nonexistent/file.mkv"), 2, "eng");
        assert!(matches!(result, Err(ExtractionError::FileNotFound(_))));
    }
}
