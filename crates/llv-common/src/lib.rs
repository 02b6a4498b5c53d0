//! Common types and utilities for the llv language-level analyzer.
//!
//! This crate provides foundational types used across all llv crates:
//! - Source positions (`SourceInfo`)
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`) and message templates
//! - Analysis limits and thresholds

// Position types for line/column source locations
pub mod position;
pub use position::SourceInfo;

// Diagnostic records and message lookup
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, diagnostic_codes, diagnostic_messages, format_message,
};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
