//! Streaming accumulation of one results file

use crate::error::{ResultsError, ResultsResult};
use crate::record::{parse_line_bytes, LineOutcome};
use crate::report::FileReport;
use crate::stats::SummaryStats;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Aggregation state local to a single file
#[derive(Debug, Default)]
pub struct FileAccumulator {
    total_lines: u64,
    skipped_lines: u64,
    ignored_records: u64,
    test_type: Option<String>,
    samples: BTreeMap<String, Vec<f64>>,
}

impl FileAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a line and fold its outcome into the running state
    pub fn push(&mut self, outcome: LineOutcome) {
        self.total_lines += 1;

        match outcome {
            LineOutcome::Sample(sample) => {
                if self.test_type.is_none() {
                    self.test_type = sample.test_type;
                }
                self.samples.entry(sample.metric).or_default().push(sample.value);
            }
            LineOutcome::Ignored => self.ignored_records += 1,
            LineOutcome::Skipped(reason) => {
                trace!(line = self.total_lines, %reason, "Skipping line");
                self.skipped_lines += 1;
            }
        }
    }

    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Compute per-metric statistics and derived values
    pub fn finish(self, file: impl Into<String>) -> FileReport {
        let file = file.into();
        debug!(
            file = %file,
            lines = self.total_lines,
            skipped = self.skipped_lines,
            ignored = self.ignored_records,
            metrics = self.samples.len(),
            "Aggregated results file"
        );

        let metrics = self
            .samples
            .iter()
            .map(|(name, values)| (name.clone(), SummaryStats::from_values(values)))
            .collect();

        FileReport::new(
            file,
            self.test_type,
            self.total_lines,
            self.skipped_lines,
            metrics,
        )
    }
}

/// Aggregate every line of `reader` into a report labelled `file`
pub fn aggregate_reader<R: BufRead>(file: &str, mut reader: R) -> io::Result<FileReport> {
    let mut accumulator = FileAccumulator::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        accumulator.push(parse_line_bytes(trim_line_ending(&buf)));
    }

    Ok(accumulator.finish(file))
}

/// Open and aggregate a results file
pub fn aggregate_file(path: &Path) -> ResultsResult<FileReport> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let read_error = |source| ResultsError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    aggregate_reader(&file_name, BufReader::new(file)).map_err(read_error)
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
