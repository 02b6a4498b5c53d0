//! Diagnostic records and message lookup.
//!
//! Every error the analysis reports is a `Diagnostic`. Records are appended
//! in traversal order and never removed during a run.

use crate::position::SourceInfo;
use serde::Serialize;
use std::fmt;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

/// Line/column value used when a diagnostic has no resolvable position.
pub const UNKNOWN_POSITION: i32 = -1;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => f.write_str("warning"),
            DiagnosticCategory::Error => f.write_str("error"),
        }
    }
}

/// One entry of a run's error log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Source file, `None` when the position could not be resolved.
    pub file: Option<String>,
    /// 1-based line, or `UNKNOWN_POSITION`.
    pub line: i32,
    /// 1-based column, or `UNKNOWN_POSITION`.
    pub column: i32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// The offending node's children were not visited.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub prunes_subtree: bool,
}

impl Diagnostic {
    /// Create a new error diagnostic at a node position.
    #[must_use]
    pub fn error(file: impl Into<String>, pos: SourceInfo, message: String, code: u32) -> Self {
        let (line, column) = if pos.is_none() {
            (UNKNOWN_POSITION, UNKNOWN_POSITION)
        } else {
            (pos.line as i32, pos.column as i32)
        };
        Self {
            file: Some(file.into()),
            line,
            column,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            prunes_subtree: false,
        }
    }

    /// Create a diagnostic with no source position at all.
    #[must_use]
    pub const fn unpositioned(message: String, category: DiagnosticCategory, code: u32) -> Self {
        Self {
            file: None,
            line: UNKNOWN_POSITION,
            column: UNKNOWN_POSITION,
            message_text: message,
            category,
            code,
            prunes_subtree: false,
        }
    }

    /// Mark the diagnostic as having stopped traversal of its node.
    #[must_use]
    pub fn pruning(mut self) -> Self {
        self.prunes_subtree = true;
        self
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }

    pub fn has_position(&self) -> bool {
        self.line != UNKNOWN_POSITION
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.has_position()) {
            (Some(file), true) => write!(f, "{}:{}:{}: ", file, self.line, self.column)?,
            (Some(file), false) => write!(f, "{file}: ")?,
            (None, _) => {}
        }
        write!(f, "{}: {}", self.category, self.message_text)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}
