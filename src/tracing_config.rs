//! Logging setup for the `llv` binaries.
//!
//! Nothing is installed unless `LLV_LOG` (or `RUST_LOG`) is set. `LLV_LOG`
//! accepts full filter directives, and a bare level such as `debug` is
//! narrowed to the llv crates so dependency noise stays at `warn`.
//! `LLV_LOG_FORMAT` picks the output:
//!
//! - `text` (default): one line per event
//! - `tree`: `tracing-tree` output, indented by the `analyze_file` span of
//!   each file and the `visit_type_decl` span of each class
//! - `json`: one JSON object per event, with the enclosing span's file and
//!   level fields
//!
//! ```bash
//! LLV_LOG=debug LLV_LOG_FORMAT=tree llv check trees/
//! LLV_LOG="llv_checker::continuations=trace" llv check trees/
//! ```
//!
//! Output goes to stderr; stdout carries diagnostics and the interaction
//! loop.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Crates a bare `LLV_LOG` level applies to.
pub const LLV_TARGETS: &[&str] = &[
    "llv",
    "llv_cli",
    "llv_checker",
    "llv_binder",
    "llv_syntax",
    "llv_common",
];

const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to `Text`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What `init_tracing` would install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives.
    pub directives: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn from_env() -> Option<Self> {
        let llv_log = std::env::var("LLV_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let format = std::env::var("LLV_LOG_FORMAT").ok();
        Self::from_vars(llv_log.as_deref(), rust_log.as_deref(), format.as_deref())
    }

    /// `LLV_LOG` wins over `RUST_LOG`; `RUST_LOG` is used verbatim.
    pub fn from_vars(
        llv_log: Option<&str>,
        rust_log: Option<&str>,
        format: Option<&str>,
    ) -> Option<Self> {
        let directives = match (llv_log, rust_log) {
            (Some(llv), _) => scoped_directives(llv),
            (None, Some(rust)) => rust.trim().to_string(),
            (None, None) => return None,
        };
        Some(LogConfig {
            directives,
            format: format.map_or(LogFormat::Text, LogFormat::parse),
        })
    }
}

/// Expand a bare level into per-crate directives; anything else is kept.
pub fn scoped_directives(value: &str) -> String {
    let value = value.trim();
    let level = value.to_lowercase();
    if !LEVELS.contains(&level.as_str()) {
        return value.to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(LLV_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Install the global subscriber described by the environment.
///
/// Returns `false` when logging was not requested or a subscriber is
/// already installed.
pub fn init_tracing() -> bool {
    let Some(config) = LogConfig::from_env() else {
        return false;
    };
    let filter = EnvFilter::builder().parse_lossy(&config.directives);

    match config.format {
        LogFormat::Tree => {
            let layer = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_indent_lines(true)
                .with_targets(true)
                .with_bracketed_fields(true);
            Registry::default().with(filter).with(layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
