//! Discovery and analysis of every results file in a directory

use crate::accumulator::aggregate_file;
use crate::error::{ResultsError, ResultsResult};
use crate::report::FileReport;
use apiload_config::ResultsConfig;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome for a single file
#[derive(Debug)]
pub enum FileOutcome {
    Analyzed(FileReport),
    Failed { file: String, error: ResultsError },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            FileOutcome::Analyzed(report) => &report.file,
            FileOutcome::Failed { file, .. } => file,
        }
    }
}

/// Outcome of analyzing a results directory
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The directory does not exist
    DirectoryMissing { directory: PathBuf },
    /// The directory holds no file with the configured extension
    NoResultFiles {
        directory: PathBuf,
        extension: String,
    },
    /// One outcome per result file, in file name order
    Analyzed {
        directory: PathBuf,
        files: Vec<FileOutcome>,
    },
}

impl AnalysisOutcome {
    pub fn directory(&self) -> &Path {
        match self {
            AnalysisOutcome::DirectoryMissing { directory }
            | AnalysisOutcome::NoResultFiles { directory, .. }
            | AnalysisOutcome::Analyzed { directory, .. } => directory,
        }
    }
}

/// Regular files (or links to them) directly under `directory` whose
/// extension is `extension`, sorted by file name. `None` when the directory
/// does not exist.
pub fn discover_result_files(
    directory: &Path,
    extension: &str,
) -> ResultsResult<Option<Vec<PathBuf>>> {
    let read_dir_error = |source| ResultsError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_dir_error(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        if path.extension() != Some(OsStr::new(extension)) {
            continue;
        }

        // Dangling links are kept so the failed read shows up in the report
        let file_type = entry.file_type().map_err(read_dir_error)?;
        let candidate =
            file_type.is_file() || (file_type.is_symlink() && (path.is_file() || !path.exists()));
        if candidate {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(Some(files))
}

/// Analyze every result file in the configured directory
///
/// Per-file read failures are reported in place and do not stop the scan.
pub fn analyze_directory(config: &ResultsConfig) -> ResultsResult<AnalysisOutcome> {
    let directory = config.directory.clone();

    let Some(paths) = discover_result_files(&directory, &config.extension)? else {
        debug!(directory = %directory.display(), "Results directory does not exist");
        return Ok(AnalysisOutcome::DirectoryMissing { directory });
    };

    if paths.is_empty() {
        return Ok(AnalysisOutcome::NoResultFiles {
            directory,
            extension: config.extension.clone(),
        });
    }

    info!(
        directory = %directory.display(),
        files = paths.len(),
        "Analyzing results files"
    );

    let files = paths
        .iter()
        .map(|path| match aggregate_file(path) {
            Ok(report) => FileOutcome::Analyzed(report),
            Err(error) => {
                warn!(file = %path.display(), %error, "Failed to analyze results file");
                FileOutcome::Failed {
                    file: display_name(path),
                    error,
                }
            }
        })
        .collect();

    Ok(AnalysisOutcome::Analyzed { directory, files })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.json", "notes.txt", "c.JSON", "archive.json.gz"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = discover_result_files(dir.path(), "json").unwrap().unwrap();
        let names: Vec<_> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discovery_of_links() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("target.txt"), "").unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        symlink(dir.path().join("target.txt"), dir.path().join("linked.json")).unwrap();
        symlink(dir.path().join("inner"), dir.path().join("folder.json")).unwrap();
        symlink(dir.path().join("gone"), dir.path().join("stale.json")).unwrap();

        let files = discover_result_files(dir.path(), "json").unwrap().unwrap();
        let names: Vec<_> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["linked.json", "stale.json"]);
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("results");
        assert!(discover_result_files(&missing, "json").unwrap().is_none());
    }

    #[test]
    fn test_plain_file_as_directory_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("results");
        fs::write(&file, "").unwrap();

        let err = discover_result_files(&file, "json").unwrap_err();
        assert!(matches!(err, ResultsError::ReadDir { .. }));
    }
}
