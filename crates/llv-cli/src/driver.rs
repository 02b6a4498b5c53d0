//! `llv check`: discover tree files, load them and run one batch.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use llv_checker::{AnalysisResult, Analyzer, LanguageLevel, SourceUnit};
use llv_syntax::SyntaxTree;

use crate::args::CheckArgs;

/// Extension of serialized syntax trees.
pub const TREE_EXTENSION: &str = "json";

/// A tree file that could not be turned into a [`SyntaxTree`].
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            LoadError::Json { path, source } => {
                write!(f, "{} is not a valid syntax tree: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
        }
    }
}

pub struct CheckResult {
    pub analysis: AnalysisResult,
    pub files_read: Vec<PathBuf>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.analysis.has_errors()
    }
}

/// Tree files named by `inputs`: files as given, directories searched
/// recursively. Directory results are sorted so runs are reproducible.
pub fn discover_trees(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == TREE_EXTENSION))
            .collect();
        found.sort();
        files.extend(found);
    }
    files
}

pub fn load_tree(path: &Path) -> Result<SyntaxTree, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SyntaxTree::from_json(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every tree named by `args` and check them as one batch.
pub fn check(args: &CheckArgs) -> Result<CheckResult> {
    let files = discover_trees(&args.inputs);
    if files.is_empty() {
        anyhow::bail!("no syntax trees found");
    }

    let level = args.level.map(LanguageLevel::from);
    let mut units = Vec::with_capacity(files.len());
    for path in &files {
        let tree = load_tree(path).with_context(|| format!("failed to load {}", path.display()))?;
        debug!(path = %path.display(), file = %tree.file_name, nodes = tree.arena.len(), "loaded tree");
        units.push(match level {
            Some(level) => SourceUnit::with_level(tree, level),
            None => SourceUnit::new(tree),
        });
    }

    let analysis = Analyzer::analyze_batch(&units, args.checker_options());
    info!(
        files = files.len(),
        errors = analysis.error_count(),
        "batch checked"
    );
    Ok(CheckResult {
        analysis,
        files_read: files,
    })
}
