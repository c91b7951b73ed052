//! Scratch folder for extracted subtitle files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A folder that holds one extraction at a time.
///
/// Cleared before and after each file and before each track, so a file
/// from one track is never read as another track's output.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    dir: PathBuf,
}

impl ScratchArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a file named `<label>.<extension>` inside the folder.
    pub fn file(&self, label: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", label, extension))
    }

    /// Create the folder if needed.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Delete everything inside the folder, keeping the folder itself.
    pub fn clear(&self) -> io::Result<()> {
        if !self.dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }

        tracing::trace!("Cleared scratch folder {}", self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn clear_removes_contents_but_keeps_folder() {
        let dir = tempdir().unwrap();
        let scratch = ScratchArea::new(dir.path().join("subs_test"));
        scratch.ensure().unwrap();

        fs::write(scratch.file("lang_test", "srt"), "x").unwrap();
        fs::create_dir(scratch.dir().join("nested")).unwrap();
        fs::write(scratch.dir().join("nested/inner.sup"), "y").unwrap();

        scratch.clear().unwrap();

        assert!(scratch.dir().is_dir());
        assert_eq!(fs::read_dir(scratch.dir()).unwrap().count(), 0);
    }

    #[test]
    fn clear_missing_folder_is_ok() {
        let dir = tempdir().unwrap();
        let scratch = ScratchArea::new(dir.path().join("missing"));
        assert!(scratch.clear().is_ok());
    }

    #[test]
    fn file_path_uses_label_and_extension() {
        let scratch = ScratchArea::new("/tmp/subs_test");
        assert_eq!(
            scratch.file("lang_comparison", "ass"),
            PathBuf::from("/tmp/subs_test/lang_comparison.ass")
        );
    }
}
