//! `apiload analyze`

use anyhow::{Context, Result};
use apiload_config::{ResultsConfig, Validatable};
use apiload_results::{analyze_directory, render, render_text, AnalysisOutcome, ReportFormat};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Command-line overrides of the configured results location
#[derive(Debug, Default, Clone)]
pub struct AnalyzeOptions {
    pub results_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub format: ReportFormat,
}

impl AnalyzeOptions {
    /// Apply the overrides on top of `base`
    pub fn resolve(&self, base: &ResultsConfig) -> Result<ResultsConfig> {
        let mut results = base.clone();
        if let Some(directory) = &self.results_dir {
            results.directory = directory.clone();
        }
        if let Some(extension) = &self.extension {
            results.extension = extension.trim_start_matches('.').to_string();
        }
        results.validate().context("Invalid results settings")?;
        Ok(results)
    }
}

/// Analyze the results directory, writing the report to `out`
///
/// Returns `false` when the results directory is missing; the message for
/// that case goes to `err`.
pub fn handle_analyze<W: Write, E: Write>(
    base: &ResultsConfig,
    options: &AnalyzeOptions,
    out: &mut W,
    err: &mut E,
) -> Result<bool> {
    let results = options.resolve(base)?;
    debug!(
        directory = %results.directory.display(),
        extension = %results.extension,
        format = %options.format,
        "Analyzing results"
    );

    let outcome = analyze_directory(&results)?;

    if let AnalysisOutcome::DirectoryMissing { .. } = outcome {
        render_text(err, &outcome).context("Failed to write message")?;
        return Ok(false);
    }

    render(out, &outcome, options.format).context("Failed to write report")?;
    out.flush().context("Failed to write report")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(base: &ResultsConfig, options: &AnalyzeOptions) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = handle_analyze(base, options, &mut out, &mut err).unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_missing_directory_reports_on_stderr() {
        let dir = TempDir::new().unwrap();
        let options = AnalyzeOptions {
            results_dir: Some(dir.path().join("results")),
            ..AnalyzeOptions::default()
        };

        let (ok, out, err) = run(&ResultsConfig::default(), &options);
        assert!(!ok);
        assert!(out.is_empty());
        assert!(err.contains("No results directory found"));
    }

    #[test]
    fn test_empty_directory_succeeds() {
        let dir = TempDir::new().unwrap();
        let options = AnalyzeOptions {
            results_dir: Some(dir.path().to_path_buf()),
            ..AnalyzeOptions::default()
        };

        let (ok, out, _) = run(&ResultsConfig::default(), &options);
        assert!(ok);
        assert!(out.contains("No .json result files found"));
    }

    #[test]
    fn test_overrides_win_over_configuration() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("run.ndjson"),
            r#"{"type":"Point","metric":"http_reqs","data":{"value":1,"tags":{"testType":"smoke"}}}"#,
        )
        .unwrap();

        let base = ResultsConfig {
            directory: PathBuf::from("/definitely/not/here"),
            extension: "json".to_string(),
        };
        let options = AnalyzeOptions {
            results_dir: Some(dir.path().to_path_buf()),
            extension: Some(".ndjson".to_string()),
            format: ReportFormat::Json,
        };

        let (ok, out, _) = run(&base, &options);
        assert!(ok);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["files"][0]["file"], "run.ndjson");
        assert_eq!(value["files"][0]["test_type"], "smoke");
    }

    #[test]
    fn test_empty_extension_is_rejected() {
        let options = AnalyzeOptions {
            extension: Some(String::new()),
            ..AnalyzeOptions::default()
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert!(handle_analyze(&ResultsConfig::default(), &options, &mut out, &mut err).is_err());
    }
}
