//! Adapter that records an external compiler's diagnostics.
//!
//! The external tool reports through a [`DiagnosticReporter`]. Wrapping its
//! reporter in a [`RecordingReporter`] turns every report into a
//! [`Diagnostic`] while still forwarding it to the wrapped reporter.

use std::io::Write;

use llv_common::{Diagnostic, DiagnosticCategory, diagnostic_codes};

/// Severity as the external tool reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Where the external tool says a diagnostic belongs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportedPosition {
    /// A real place in a source file. Line and column are 1-based.
    Source {
        file: String,
        line: u32,
        column: u32,
    },
    /// A made-up position the tool uses for option or driver errors.
    Synthetic(String),
    NoPosition,
}

impl ReportedPosition {
    pub fn source(file: impl Into<String>, line: u32, column: u32) -> Self {
        ReportedPosition::Source {
            file: file.into(),
            line,
            column,
        }
    }
}

/// Callback interface of the external compiler.
pub trait DiagnosticReporter {
    fn report(&mut self, position: &ReportedPosition, message: &str, severity: Severity);
}

/// Default presentation: one line per report.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DiagnosticReporter for ConsoleReporter<W> {
    fn report(&mut self, position: &ReportedPosition, message: &str, severity: Severity) {
        let label = match severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        let written = match position {
            ReportedPosition::Source { file, line, column } => {
                writeln!(self.out, "{file}:{line}:{column}: {label}: {message}")
            }
            ReportedPosition::Synthetic(origin) => writeln!(self.out, "{origin}: {label}: {message}"),
            ReportedPosition::NoPosition => writeln!(self.out, "{label}: {message}"),
        };
        if let Err(err) = written {
            tracing::warn!(%err, "failed to write compiler diagnostic");
        }
    }
}

/// Records every report, then hands it to the wrapped reporter.
pub struct RecordingReporter<R> {
    inner: R,
    records: Vec<Diagnostic>,
}

impl<R: DiagnosticReporter> RecordingReporter<R> {
    pub fn new(inner: R) -> Self {
        RecordingReporter {
            inner,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_parts(self) -> (R, Vec<Diagnostic>) {
        (self.inner, self.records)
    }
}

impl<R: DiagnosticReporter> DiagnosticReporter for RecordingReporter<R> {
    fn report(&mut self, position: &ReportedPosition, message: &str, severity: Severity) {
        let category = if severity == Severity::Error {
            DiagnosticCategory::Error
        } else {
            DiagnosticCategory::Warning
        };
        let record = match position {
            ReportedPosition::Source { file, line, column } => Diagnostic {
                file: Some(file.clone()),
                line: i32::try_from(*line).unwrap_or(i32::MAX),
                column: i32::try_from(*column).unwrap_or(i32::MAX),
                message_text: message.to_string(),
                category,
                code: diagnostic_codes::EXTERNAL_COMPILER,
                prunes_subtree: false,
            },
            ReportedPosition::Synthetic(_) | ReportedPosition::NoPosition => Diagnostic::unpositioned(
                message.to_string(),
                category,
                diagnostic_codes::EXTERNAL_COMPILER,
            ),
        };
        self.records.push(record);
        self.inner.report(position, message, severity);
    }
}
