//! Diagnostics recorded during a run.

use crate::context::FileId;
use llv_common::{Diagnostic, DiagnosticCategory};
use llv_syntax::NodeIndex;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Ordered diagnostics plus the nodes whose subtrees were skipped.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    diagnostics: Vec<Diagnostic>,
    pruned: FxHashSet<(FileId, NodeIndex)>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and stop traversal below `node`.
    pub fn add_error(&mut self, file: FileId, node: NodeIndex, diagnostic: Diagnostic) {
        debug!(code = diagnostic.code, node = node.0, "error prunes subtree");
        self.pruned.insert((file, node));
        self.diagnostics.push(diagnostic.pruning());
    }

    /// Record a diagnostic and keep traversing.
    pub fn add_and_ignore_error(&mut self, diagnostic: Diagnostic) {
        debug!(code = diagnostic.code, "error recorded");
        self.diagnostics.push(diagnostic);
    }

    pub fn is_pruned(&self, file: FileId, node: NodeIndex) -> bool {
        self.pruned.contains(&(file, node))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
