use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use llv_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
    /// Source text by file name, `None` once a read has failed.
    sources: FxHashMap<String, Option<String>>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
        }
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = match (&diagnostic.file, diagnostic.has_position()) {
            (Some(file), true) => format!("{}:{}:{}", file, diagnostic.line, diagnostic.column),
            (Some(file), false) => file.clone(),
            (None, _) => "<unknown>".to_string(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let (Some(file), true) = (&diagnostic.file, diagnostic.has_position()) {
            if let Some(snippet) = self.format_snippet(file, diagnostic.line, diagnostic.column) {
                output.push_str(&snippet);
            }
        }
        output
    }

    /// `Found 2 errors.` style summary, empty when there is nothing to report.
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> String {
        let errors = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Error)
            .count();
        let files = {
            let mut names: Vec<&str> = diagnostics.iter().filter_map(|d| d.file.as_deref()).collect();
            names.sort_unstable();
            names.dedup();
            names.len()
        };
        match (errors, files) {
            (0, _) => String::new(),
            (1, _) => "Found 1 error.".to_string(),
            (n, 0) | (n, 1) => format!("Found {n} errors."),
            (n, f) => format!("Found {n} errors in {f} files."),
        }
    }

    /// The offending source line with a caret under the column, when the
    /// original source file is readable.
    fn format_snippet(&mut self, file: &str, line: i32, column: i32) -> Option<String> {
        let source = self
            .sources
            .entry(file.to_string())
            .or_insert_with(|| std::fs::read_to_string(Path::new(file)).ok())
            .as_deref()?;
        let line_text = source.lines().nth(usize::try_from(line).ok()?.checked_sub(1)?)?;

        let mut caret = " ".repeat(usize::try_from(column).ok()?.saturating_sub(1));
        caret.push('^');
        let caret = if self.color {
            caret.red().to_string()
        } else {
            caret
        };
        Some(format!("\n  {:>3}   {}\n        {}", line, line_text, caret))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.to_string();
        if !self.color {
            return label;
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }
        let label = format!("LLV{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
