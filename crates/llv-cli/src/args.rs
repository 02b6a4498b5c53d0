use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use llv_binder::DuplicateScope;
use llv_checker::{CheckerOptions, LanguageLevel};

/// CLI arguments for the llv binary.
#[derive(Parser, Debug)]
#[command(
    name = "llv",
    version,
    about = "Language-level checker for the Elementary, Intermediate and Advanced Java dialects"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check syntax trees (JSON) and report language-level errors.
    Check(CheckArgs),
    /// Start an interactive evaluation loop.
    Repl(ReplArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Tree files or directories containing them (searched recursively for `*.json`).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Check every file at this level instead of the one named by its extension.
    #[arg(long, value_enum, ignore_case = true)]
    pub level: Option<Level>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Which enclosing bodies a new local variable's name is checked against.
    #[arg(long = "duplicate-scope", value_enum, default_value_t = DuplicateScopeArg::Immediate)]
    pub duplicate_scope: DuplicateScopeArg,

    /// Maximum nesting depth before a construct is rejected.
    #[arg(long = "max-depth")]
    pub max_depth: Option<u32>,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl CheckArgs {
    pub fn checker_options(&self) -> CheckerOptions {
        let defaults = CheckerOptions::default();
        CheckerOptions {
            duplicate_scope: self.duplicate_scope.into(),
            max_visit_depth: self.max_depth.unwrap_or(defaults.max_visit_depth),
        }
    }
}

#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Class path entries, separated by `:` or `;`.
    #[arg(long, visible_alias = "cp", value_name = "PATHS")]
    pub classpath: Option<String>,

    /// Echo each input line after the prompt (for scripted sessions).
    #[arg(short = 'b', long)]
    pub batch: bool,
}

impl ReplArgs {
    /// Class path entries; empty when none were given.
    pub fn classpath_entries(&self) -> Vec<PathBuf> {
        self.classpath
            .as_deref()
            .map(|paths| {
                paths
                    .split([':', ';'])
                    .filter(|entry| !entry.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Level {
    #[value(alias = "dj0")]
    Elementary,
    #[value(alias = "dj1")]
    Intermediate,
    #[value(alias = "dj2")]
    Advanced,
    #[value(alias = "java")]
    Full,
}

impl From<Level> for LanguageLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Elementary => LanguageLevel::Elementary,
            Level::Intermediate => LanguageLevel::Intermediate,
            Level::Advanced => LanguageLevel::Advanced,
            Level::Full => LanguageLevel::Full,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DuplicateScopeArg {
    /// Only the innermost body.
    Immediate,
    /// Every body up to the enclosing method.
    Enclosing,
}

impl From<DuplicateScopeArg> for DuplicateScope {
    fn from(arg: DuplicateScopeArg) -> Self {
        match arg {
            DuplicateScopeArg::Immediate => DuplicateScope::Immediate,
            DuplicateScopeArg::Enclosing => DuplicateScope::EnclosingBodies,
        }
    }
}
