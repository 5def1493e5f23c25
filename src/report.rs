//! Console report of a run: link count, per-file progress, final summary.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::download::{DispatchObserver, DispatchReport, DownloadOutcome};

/// Converts a byte count to kilobytes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn kilobytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Writes report lines to a shared sink.
///
/// Download tasks call into it concurrently; each line is written while
/// holding the sink lock, so lines never interleave. Write failures are
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct Reporter<W: Write + Send> {
    out: Mutex<W>,
}

impl Reporter<io::Stdout> {
    /// Reporter printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Reporter<W> {
    /// Reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Prints the number of links found before dispatch.
    pub fn files_to_download(&self, count: usize) {
        self.write_line(&format!("Files to download: {count}"));
    }

    /// Prints the enumerated list of saved files.
    pub fn summary(&self, report: &DispatchReport) {
        let mut lines = vec!["List of downloaded files: ".to_string()];
        lines.extend(report.file_names().iter().map(|name| format!("\t-{name}")));
        self.write_line(&lines.join("\n"));
    }

    /// Returns the sink, consuming the reporter.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write report line");
        }
    }
}

impl<W: Write + Send> DispatchObserver for Reporter<W> {
    fn file_started(&self, file_name: &str) {
        self.write_line(&format!("Downloading {file_name}"));
    }

    fn file_saved(&self, outcome: &DownloadOutcome) {
        self.write_line(&format!(
            "Copied {:.2} KB in file {}",
            kilobytes(outcome.bytes),
            outcome.file_name
        ));
    }
}
