//! SubtitleEdit conversion of image-based subtitles to SRT.
//!
//! PGS and VobSub tracks carry bitmaps, not text. SubtitleEdit OCRs them
//! into SRT so the text can be classified. It runs under mono inside a
//! virtual X server, which makes it by far the slowest step of a run.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::types::{ExtractionError, ExtractionResult};
use super::run_tool;

/// Converter invoking `SubtitleEdit.exe /convert`.
#[derive(Debug, Clone)]
pub struct SubtitleEditConverter {
    /// Folder containing SubtitleEdit.exe.
    se_dir: PathBuf,
}

impl SubtitleEditConverter {
    /// Create a converter for the SubtitleEdit install in `se_dir`.
    pub fn new(se_dir: impl Into<PathBuf>) -> Self {
        Self {
            se_dir: se_dir.into(),
        }
    }

    /// Path to the SubtitleEdit executable.
    pub fn executable(&self) -> PathBuf {
        self.se_dir.join("SubtitleEdit.exe")
    }

    /// Build the conversion command for `input`.
    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new("xvfb-run");
        cmd.arg("-a")
            .arg("mono")
            .arg(self.executable())
            .arg("/convert")
            .arg(input)
            .args(["srt", "/RemoveFormatting", "/MergeSameTexts", "/overwrite"]);
        cmd
    }
}

/// Convert a subtitle file to SRT next to the input and return the SRT path.
///
/// SRT input is returned unchanged.
pub fn convert_to_srt(converter: &SubtitleEditConverter, input: &Path) -> ExtractionResult<PathBuf> {
    let is_srt = input
        .extension()
        .map(|e| e.eq_ignore_ascii_case("srt"))
        .unwrap_or(false);
    if is_srt {
        return Ok(input.to_path_buf());
    }

    if !input.exists() {
        return Err(ExtractionError::FileNotFound(input.to_path_buf()));
    }

    let mut cmd = converter.command(input);
    run_tool("SubtitleEdit", &mut cmd)?;

    let converted = input.with_extension("srt");
    if !converted.is_file() {
        return Err(ExtractionError::OutputMissing(converted));
    }

    tracing::info!("Converted {} to SRT", input.display());
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn srt_input_is_passed_through() {
        let converter = SubtitleEditConverter::new("/opt/se");
        let path = Path::new("/tmp/subs_test/lang_test.srt");
        assert_eq!(convert_to_srt(&converter, path).unwrap(), path);
    }

    #[test]
    fn missing_input_errors() {
        let dir = tempdir().unwrap();
        let converter = SubtitleEditConverter::new(dir.path());
        let result = convert_to_srt(&converter, &dir.path().join("lang_test.sup"));
        assert!(matches!(result, Err(ExtractionError::FileNotFound(_))));
    }

    #[test]
    fn command_targets_subtitle_edit() {
        let converter = SubtitleEditConverter::new("/opt/se");
        assert_eq!(converter.executable(), PathBuf::from("/opt/se/SubtitleEdit.exe"));

        let cmd = converter.command(Path::new("/tmp/a.sup"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args[0], "-a");
        assert!(args.contains(&"/convert".to_string()));
        assert!(args.contains(&"/MergeSameTexts".to_string()));
    }
}
