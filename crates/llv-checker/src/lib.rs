//! Language-level checker.
//!
//! This crate is organized into several modules:
//! - `level` - `LanguageLevel` and file-extension mapping
//! - `policy` - per-level rule tables and the policy chain
//! - `error_log` - diagnostics plus the set of pruned nodes
//! - `continuations` - forward references waiting for a declaration
//! - `context` - `CheckerContext`, the state shared by every walker of a run
//! - `resolve` - type name resolution
//! - `walker` - `LevelWalker`, the traversal engine
//! - `analyzer` - batch driver over several files

pub mod analyzer;
pub mod context;
pub mod continuations;
pub mod error_log;
pub mod level;
pub mod policy;
pub mod resolve;
pub mod walker;

pub use analyzer::{AnalysisResult, Analyzer, SourceUnit};
pub use context::{CheckerContext, CheckerOptions, FileContext, FileId};
pub use continuations::{Continuation, ContinuationResolver, DeferredCheck};
pub use error_log::ErrorLog;
pub use level::LanguageLevel;
pub use policy::{Directive, PolicyChain, ScopeKind, Step};
pub use walker::{LevelWalker, Outcome, WalkScope};

pub mod diagnostics {
    pub use llv_common::diagnostics::{
        Diagnostic, DiagnosticCategory, diagnostic_codes, diagnostic_messages, format_message,
    };
}

#[cfg(test)]
#[path = "tests/error_log_tests.rs"]
mod error_log_tests;
#[cfg(test)]
#[path = "tests/continuations_tests.rs"]
mod continuations_tests;
#[cfg(test)]
#[path = "tests/policy_tests.rs"]
mod policy_tests;
#[cfg(test)]
#[path = "tests/walker_tests.rs"]
mod walker_tests;
#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod resolve_tests;
