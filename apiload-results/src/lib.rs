//! Aggregation of the load engine's newline-delimited JSON metric output
//!
//! Each results file is streamed line by line. Every line is classified as a
//! metric sample, an ignored record or a skipped (malformed) line, samples are
//! grouped per metric, and a [`FileReport`] with summary statistics and
//! derived ratios is produced per file.

pub mod accumulator;
pub mod error;
pub mod record;
pub mod render;
pub mod report;
pub mod scan;
pub mod stats;

pub use accumulator::{aggregate_file, aggregate_reader, FileAccumulator};
pub use error::{ResultsError, ResultsResult};
pub use record::{parse_line, parse_line_bytes, LineOutcome, Sample, SkipReason};
pub use render::{render, render_json, render_text, ReportFormat};
pub use report::{metric_names, CheckSummary, DerivedMetrics, FileReport, UNKNOWN_TEST_TYPE};
pub use scan::{analyze_directory, discover_result_files, AnalysisOutcome, FileOutcome};
pub use stats::SummaryStats;
