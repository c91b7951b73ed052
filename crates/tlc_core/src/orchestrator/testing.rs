//! In-memory collaborators for controller and run tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::container::{ContainerReader, ContainerWriter, SubtitleSource};
use crate::detection::{Classification, ClassificationOracle, OracleError};
use crate::extraction::{ExtractionError, ExtractionResult};
use crate::models::Track;

/// Files, tracks and dialogue held in memory. Records writes.
#[derive(Default)]
pub struct FakeContainer {
    files: HashMap<PathBuf, Vec<Track>>,
    lines: HashMap<(PathBuf, usize), Vec<String>>,
    writes: RefCell<Vec<(usize, String)>>,
    extractions: Cell<usize>,
    reads: Cell<usize>,
    clears: Cell<usize>,
}

impl FakeContainer {
    pub fn with_file(mut self, path: impl AsRef<Path>, tracks: Vec<Track>) -> Self {
        self.files.insert(path.as_ref().to_path_buf(), tracks);
        self
    }

    pub fn with_lines(mut self, path: impl AsRef<Path>, track_id: usize, lines: Vec<String>) -> Self {
        self.lines.insert((path.as_ref().to_path_buf(), track_id), lines);
        self
    }

    pub fn writes(&self) -> Vec<(usize, String)> {
        self.writes.borrow().clone()
    }

    pub fn extractions(&self) -> usize {
        self.extractions.get()
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.get()
    }
}

impl ContainerReader for FakeContainer {
    fn read_tracks(&self, path: &Path) -> ExtractionResult<Vec<Track>> {
        self.reads.set(self.reads.get() + 1);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ExtractionError::FileNotFound(path.to_path_buf()))
    }
}

impl ContainerWriter for FakeContainer {
    fn set_language(&self, _path: &Path, track: &Track, language: &str) -> ExtractionResult<()> {
        self.writes.borrow_mut().push((track.id, language.to_string()));
        Ok(())
    }
}

impl SubtitleSource for FakeContainer {
    fn extract_lines(&self, path: &Path, track: &Track, _label: &str) -> ExtractionResult<Vec<String>> {
        self.extractions.set(self.extractions.get() + 1);
        self.lines
            .get(&(path.to_path_buf(), track.id))
            .cloned()
            .ok_or_else(|| ExtractionError::CommandFailed {
                tool: "mkvextract".to_string(),
                exit_code: 2,
                message: format!("no track {}", track.id),
            })
    }

    fn clear_scratch(&self) -> std::io::Result<()> {
        self.clears.set(self.clears.get() + 1);
        Ok(())
    }
}

/// Labels each line with its first word; lines starting with "fail" error.
#[derive(Default)]
pub struct ScriptedOracle {
    calls: Cell<usize>,
}

impl ScriptedOracle {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ClassificationOracle for ScriptedOracle {
    fn classify(&self, text: &str) -> Result<Classification, OracleError> {
        self.calls.set(self.calls.get() + 1);
        match text.split_whitespace().next() {
            Some("fail") | None => Err(OracleError::MissingOutput { line: 1 }),
            Some(word) => Ok(Classification::new(word)),
        }
    }
}
