//! Top-level run: every target file, one after another.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::controller::{Collaborators, DecisionController};
use super::discovery::{check_single_file, directory_files, discover_files, DiscoveryError, FileFilter};
use super::report::{Issue, Reporter, RunReport};
use crate::config::Settings;
use crate::logging::{MessagePrefix, RunLog};
use crate::notify::Notifier;

/// What a run processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every matching file below a directory.
    Directory(PathBuf),
    /// One file. Its directory still supplies comparison files.
    File(PathBuf),
}

impl Target {
    /// Resolve to the ordered list of files to process.
    pub fn files(&self, filter: &FileFilter) -> Result<Vec<PathBuf>, DiscoveryError> {
        match self {
            Target::Directory(root) => discover_files(root, filter),
            Target::File(path) => check_single_file(path, filter).map(|p| vec![p]),
        }
    }
}

/// Process `files` in order and return the report.
///
/// Always completes: file and track failures are recorded in the report.
pub fn run(
    settings: &Settings,
    files: &[PathBuf],
    tools: Collaborators<'_>,
    notifier: &dyn Notifier,
) -> RunReport {
    let run_log = open_run_log(settings);
    let mut reporter = Reporter::new(notifier, run_log);
    let controller = DecisionController::new(settings, tools);
    let filter = FileFilter::from(&settings.scan);
    let mut siblings_by_dir: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        reporter.note(MessagePrefix::Section, &name);

        clear_scratch(tools);

        let dir = parent_dir(path);
        let siblings = siblings_by_dir
            .entry(dir)
            .or_insert_with_key(|dir| sibling_candidates(dir, &filter));

        if let Err(e) = controller.process_file(path, siblings, &mut reporter) {
            reporter.issue(Issue::new(path, None, e.kind(), e.to_string()));
        }
        reporter.file_processed();

        clear_scratch(tools);
    }

    reporter.finish()
}

fn open_run_log(settings: &Settings) -> Option<RunLog> {
    if !settings.logging.write_run_log {
        return None;
    }
    match RunLog::create(&settings.paths.logs_folder, settings.logging.show_timestamps) {
        Ok(log) => {
            tracing::info!("Writing run log to {}", log.log_path().display());
            Some(log)
        }
        Err(e) => {
            tracing::warn!("Run log disabled, could not create it in '{}': {}", settings.paths.logs_folder, e);
            None
        }
    }
}

/// Folder holding `path`. A bare file name lives in the working directory.
fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

fn sibling_candidates(dir: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    directory_files(dir, filter).unwrap_or_else(|e| {
        tracing::warn!("Could not list comparison files in {}: {}", dir.display(), e);
        Vec::new()
    })
}

fn clear_scratch(tools: Collaborators<'_>) {
    if let Err(e) = tools.source.clear_scratch() {
        tracing::warn!("Failed to clear scratch folder: {}", e);
    }
}
