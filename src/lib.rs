//! llv: staged language-level semantic analysis.
//!
//! Each source file is checked at the level named by its extension
//! (`.dj0` Elementary, `.dj1` Intermediate, `.dj2` Advanced, `.java` Full
//! Java). The analysis builds a shared symbol table, records level
//! violations and declaration errors, and resolves forward references
//! across the files of one batch.
//!
//! ```ignore
//! let result = llv::check_batch(&[llv::SourceUnit::new(tree)], Default::default());
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

// Common types - positions, diagnostics, limits
pub use llv_common as common;
pub use llv_common::{Diagnostic, DiagnosticCategory, SourceInfo};

// Syntax tree model consumed by the checker
pub use llv_syntax as syntax;
pub use llv_syntax::{SyntaxTree, TreeBuilder};

// Symbol table model
pub use llv_binder as binder;
pub use llv_binder::{DuplicateScope, SymbolTable};

// Level policies, traversal and continuation resolution
pub use llv_checker as checker;
pub use llv_checker::{AnalysisResult, Analyzer, CheckerOptions, LanguageLevel, SourceUnit};

// Tracing configuration (LLV_LOG / LLV_LOG_FORMAT)
pub mod tracing_config;
#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;

/// Check `units` as one batch, in order, and settle forward references.
pub fn check_batch(units: &[SourceUnit], options: CheckerOptions) -> AnalysisResult {
    Analyzer::analyze_batch(units, options)
}
