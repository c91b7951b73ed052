//! Media file discovery.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanSettings;

/// Scan errors. Only raised for the scan root; unreadable entries below
/// it are logged and skipped.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a {extension} file: {}", .path.display())]
    WrongExtension { path: PathBuf, extension: String },
}

/// Which files take part in a run.
#[derive(Debug, Clone)]
pub struct FileFilter {
    ignored_folder_names: Vec<String>,
    skip_name_keywords: Vec<String>,
    extension: String,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::from(&ScanSettings::default())
    }
}

impl From<&ScanSettings> for FileFilter {
    fn from(settings: &ScanSettings) -> Self {
        Self {
            ignored_folder_names: settings.ignored_folder_names.clone(),
            skip_name_keywords: settings
                .skip_name_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            extension: settings.extension.trim_start_matches('.').to_lowercase(),
        }
    }
}

impl FileFilter {
    /// Visible file with the right extension and no skip keyword in its name.
    pub fn accepts_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') {
            return false;
        }

        let has_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false);
        if !has_extension {
            return false;
        }

        let lower = name.to_lowercase();
        !self.skip_name_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    fn accepts_dir(&self, entry: &DirEntry) -> bool {
        // The scan root itself is never filtered
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        !self.ignored_folder_names.iter().any(|i| *i == name)
    }
}

/// Every accepted file under `root`, recursively, in sorted order.
pub fn discover_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>, DiscoveryError> {
    walk(root, filter, usize::MAX)
}

/// Accepted files directly inside `dir` (the sibling candidates of a file).
pub fn directory_files(dir: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>, DiscoveryError> {
    walk(dir, filter, 1)
}

/// Validate a single-file target.
pub fn check_single_file(path: &Path, filter: &FileFilter) -> Result<PathBuf, DiscoveryError> {
    if !path.is_file() {
        return Err(DiscoveryError::PathNotFound(path.to_path_buf()));
    }
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(&filter.extension))
        .unwrap_or(false);
    if !has_extension {
        return Err(DiscoveryError::WrongExtension {
            path: path.to_path_buf(),
            extension: filter.extension.clone(),
        });
    }
    Ok(path.to_path_buf())
}

fn walk(root: &Path, filter: &FileFilter, max_depth: usize) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_type().is_dir() || filter.accepts_dir(e));

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && filter.accepts_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => tracing::warn!("Error accessing entry: {}", e),
        }
    }

    tracing::debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn discovers_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b-Group.mkv"));
        touch(&root.join("a-Group.MKV"));
        touch(&root.join(".hidden.mkv"));
        touch(&root.join("notes.txt"));
        touch(&root.join("Show Trailer.mkv"));
        touch(&root.join("Season 1/ep01.mkv"));
        touch(&root.join("extras/bonus.mkv"));

        let settings = ScanSettings {
            ignored_folder_names: vec!["extras".to_string()],
            ..ScanSettings::default()
        };
        let files = discover_files(root, &FileFilter::from(&settings)).unwrap();

        assert_eq!(names(&files, root), vec!["Season 1/ep01.mkv", "a-Group.MKV", "b-Group.mkv"]);
    }

    #[test]
    fn directory_files_is_not_recursive() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("ep01.mkv"));
        touch(&dir.path().join("sub/ep02.mkv"));

        let files = directory_files(dir.path(), &FileFilter::default()).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["ep01.mkv"]);
    }

    #[test]
    fn missing_root_errors() {
        let dir = tempdir().unwrap();
        let result = discover_files(&dir.path().join("missing"), &FileFilter::default());
        assert!(matches!(result, Err(DiscoveryError::PathNotFound(_))));
    }

    #[test]
    fn single_file_checks() {
        let dir = tempdir().unwrap();
        let mkv = dir.path().join("ep01.mkv");
        let txt = dir.path().join("ep01.txt");
        touch(&mkv);
        touch(&txt);

        let filter = FileFilter::default();
        assert_eq!(check_single_file(&mkv, &filter).unwrap(), mkv);
        assert!(matches!(
            check_single_file(&txt, &filter),
            Err(DiscoveryError::WrongExtension { .. })
        ));
        assert!(check_single_file(dir.path(), &filter).is_err());
    }
}
