//! Text and JSON rendering of an analysis outcome
//!
//! Output carries no timestamps or other run-dependent values, so the same
//! input always renders to the same bytes.

use crate::report::FileReport;
use crate::scan::{AnalysisOutcome, FileOutcome};
use crate::stats::SummaryStats;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

const RULE_WIDTH: usize = 50;
const FILE_RULE_WIDTH: usize = 30;

/// How an analysis is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
        }
    }
}

/// Write `outcome` to `out` in `format`
pub fn render<W: Write>(out: &mut W, outcome: &AnalysisOutcome, format: ReportFormat) -> io::Result<()> {
    match format {
        ReportFormat::Text => render_text(out, outcome),
        ReportFormat::Json => render_json(out, outcome),
    }
}

/// Human-readable report
pub fn render_text<W: Write>(out: &mut W, outcome: &AnalysisOutcome) -> io::Result<()> {
    match outcome {
        AnalysisOutcome::DirectoryMissing { directory } => writeln!(
            out,
            "❌ No results directory found at {}. Run some tests first!",
            directory.display()
        ),
        AnalysisOutcome::NoResultFiles {
            directory,
            extension,
        } => {
            writeln!(
                out,
                "❌ No .{} result files found in {}. Run tests with JSON output:",
                extension,
                directory.display()
            )?;
            writeln!(
                out,
                "   k6 run --out json={} <script>",
                directory.join(format!("test-results.{}", extension)).display()
            )
        }
        AnalysisOutcome::Analyzed { directory, files } => {
            writeln!(out, "📊 Load Test Results Analysis")?;
            writeln!(out)?;
            writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

            for outcome in files {
                writeln!(out)?;
                match outcome {
                    FileOutcome::Analyzed(report) => write_file_report(out, report)?,
                    FileOutcome::Failed { file, error } => {
                        writeln!(out, "❌ Error analyzing {}: {}", file, error)?
                    }
                }
            }

            writeln!(out)?;
            write_tips(out, directory)
        }
    }
}

fn write_file_report<W: Write>(out: &mut W, report: &FileReport) -> io::Result<()> {
    let derived = &report.derived;

    writeln!(out, "📄 File: {}", report.file)?;
    writeln!(out, "{}", "-".repeat(FILE_RULE_WIDTH))?;
    writeln!(out, "📈 Test Type: {}", report.test_type)?;
    writeln!(out, "📦 Total Lines: {}", report.total_lines)?;
    writeln!(out, "🌐 Total Requests: {}", format_number(derived.total_requests))?;

    writeln!(out, "⏱️  Response Times (ms):")?;
    let duration = &derived.duration;
    writeln!(out, "   • Average: {}", format_ms(duration.mean))?;
    writeln!(out, "   • Min: {}", format_ms(duration.min))?;
    writeln!(out, "   • Max: {}", format_ms(duration.max))?;

    writeln!(out, "❌ Failure Rate: {:.2}%", derived.failure_rate)?;
    writeln!(
        out,
        "✅ Check Pass Rate: {:.2}% ({}/{})",
        derived.checks.pass_rate,
        format_number(derived.checks.passed),
        derived.checks.total
    )?;

    if report.skipped_lines > 0 {
        writeln!(out, "⚠️  Skipped Lines: {}", report.skipped_lines)?;
    }

    if !report.metrics.is_empty() {
        writeln!(out, "📋 Metrics:")?;
        let width = report.metrics.keys().map(String::len).max().unwrap_or(0);
        for (name, stats) in &report.metrics {
            write_metric_row(out, name, stats, width)?;
        }
    }

    Ok(())
}

fn write_metric_row<W: Write>(
    out: &mut W,
    name: &str,
    stats: &SummaryStats,
    width: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "   {:<width$}  count={} min={} mean={} max={} sum={}",
        name,
        stats.count,
        format_optional(stats.min),
        format_optional(stats.mean),
        format_optional(stats.max),
        format_number(stats.sum),
        width = width
    )
}

fn write_tips<W: Write>(out: &mut W, directory: &Path) -> io::Result<()> {
    writeln!(out, "💡 Tips:")?;
    writeln!(
        out,
        "   • Write engine output as NDJSON into {} to include it here",
        directory.display()
    )?;
    writeln!(out, "   • Use --format json for machine-readable output")?;
    writeln!(out, "   • Export a profile's options with: apiload profiles export <name>")
}

/// Whole numbers without decimals, everything else with two
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| "N/A".to_string())
}

fn format_ms(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}ms", v))
        .unwrap_or_else(|| "N/A".to_string())
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum OutcomeView<'a> {
    DirectoryMissing {
        directory: String,
    },
    NoResultFiles {
        directory: String,
        extension: &'a str,
    },
    Analyzed {
        directory: String,
        files: Vec<FileView<'a>>,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
enum FileView<'a> {
    Report(&'a FileReport),
    Failed { file: &'a str, error: String },
}

impl<'a> OutcomeView<'a> {
    fn new(outcome: &'a AnalysisOutcome) -> Self {
        let directory = outcome.directory().display().to_string();
        match outcome {
            AnalysisOutcome::DirectoryMissing { .. } => OutcomeView::DirectoryMissing { directory },
            AnalysisOutcome::NoResultFiles { extension, .. } => OutcomeView::NoResultFiles {
                directory,
                extension,
            },
            AnalysisOutcome::Analyzed { files, .. } => OutcomeView::Analyzed {
                directory,
                files: files
                    .iter()
                    .map(|file| match file {
                        FileOutcome::Analyzed(report) => FileView::Report(report),
                        FileOutcome::Failed { file, error } => FileView::Failed {
                            file,
                            error: error.to_string(),
                        },
                    })
                    .collect(),
            },
        }
    }
}

/// Pretty-printed JSON with a trailing newline
pub fn render_json<W: Write>(out: &mut W, outcome: &AnalysisOutcome) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &OutcomeView::new(outcome))?;
    writeln!(out)
}
