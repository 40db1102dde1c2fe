//! Results aggregation error types

use std::path::PathBuf;
use thiserror::Error;

/// Results aggregation result type
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Errors raised while reading result files
///
/// A missing results directory and an empty one are not errors; they are
/// reported through [`crate::AnalysisOutcome`].
#[derive(Error, Debug)]
pub enum ResultsError {
    /// The results directory exists but could not be listed
    #[error("Failed to read results directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single result file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
