//! Batch analysis over several files.

use crate::context::{CheckerContext, CheckerOptions, FileContext, FileId};
use crate::level::LanguageLevel;
use crate::policy::PolicyChain;
use crate::walker::{LevelWalker, Outcome};
use llv_binder::SymbolTable;
use llv_common::{Diagnostic, DiagnosticCategory};
use llv_syntax::SyntaxTree;
use tracing::{debug, info_span};

/// A syntax tree plus the level it is checked at.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub tree: SyntaxTree,
    pub level: LanguageLevel,
}

impl SourceUnit {
    /// Level taken from the tree's file name; Full Java when the extension
    /// is not a level extension.
    pub fn new(tree: SyntaxTree) -> Self {
        let level = LanguageLevel::for_file(&tree.file_name).unwrap_or(LanguageLevel::Full);
        SourceUnit { tree, level }
    }

    pub fn with_level(tree: SyntaxTree, level: LanguageLevel) -> Self {
        SourceUnit { tree, level }
    }

    pub fn file_name(&self) -> &str {
        &self.tree.file_name
    }
}

/// Everything a run produced.
#[derive(Debug)]
pub struct AnalysisResult {
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub files: Vec<FileContext>,
}

impl AnalysisResult {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn diagnostics_for<'a>(&'a self, file_name: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.file.as_deref() == Some(file_name))
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|d| d.message_text.as_str())
            .collect()
    }
}

/// Drives one run: files are walked in order against a shared symbol table,
/// then pending forward references are settled.
pub struct Analyzer {
    cx: CheckerContext,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(CheckerOptions::default())
    }
}

impl Analyzer {
    pub fn new(options: CheckerOptions) -> Self {
        Analyzer {
            cx: CheckerContext::new(options),
        }
    }

    pub fn with_table(table: SymbolTable, options: CheckerOptions) -> Self {
        Analyzer {
            cx: CheckerContext::with_table(table, options),
        }
    }

    pub fn context(&self) -> &CheckerContext {
        &self.cx
    }

    pub fn context_mut(&mut self) -> &mut CheckerContext {
        &mut self.cx
    }

    /// Walk one file. Forward references it makes stay pending until a
    /// later file declares them or [`Analyzer::settle`] runs.
    pub fn analyze_file(&mut self, unit: &SourceUnit) -> Outcome {
        let _span = info_span!("analyze_file", file = %unit.file_name(), level = %unit.level).entered();
        let file = self.cx.add_file(unit.file_name(), unit.level);
        let chain = PolicyChain::for_level(unit.level);
        let outcome = LevelWalker::new(&mut self.cx, &unit.tree, &chain, file).walk();
        debug!(
            ?outcome,
            diagnostics = self.cx.log.len(),
            pending = self.cx.resolver.pending_count(),
            "file walked"
        );
        outcome
    }

    pub fn file_id(&self, file_name: &str) -> Option<FileId> {
        self.cx
            .files
            .iter()
            .find(|f| f.name == file_name)
            .map(|f| f.id)
    }

    /// Resolve what can still be resolved and report the rest.
    pub fn settle(&mut self) {
        self.cx.settle();
    }

    pub fn finish(mut self) -> AnalysisResult {
        self.settle();
        let CheckerContext {
            table, log, files, ..
        } = self.cx;
        AnalysisResult {
            table,
            diagnostics: log.into_diagnostics(),
            files,
        }
    }

    /// Check every unit in order and settle.
    pub fn analyze_batch(units: &[SourceUnit], options: CheckerOptions) -> AnalysisResult {
        let mut analyzer = Analyzer::new(options);
        for unit in units {
            analyzer.analyze_file(unit);
        }
        analyzer.finish()
    }
}
