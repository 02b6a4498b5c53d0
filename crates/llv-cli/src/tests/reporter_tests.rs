use super::reporter::Reporter;
use llv_common::{Diagnostic, DiagnosticCategory, SourceInfo};
use std::io::Write;

fn error(file: &str, line: u32, column: u32, message: &str) -> Diagnostic {
    Diagnostic::error(file, SourceInfo::new(line, column), message.to_string(), 1003)
}

#[test]
fn plain_format_without_source() {
    let mut reporter = Reporter::new(false);
    let diagnostic = error("Missing.dj1", 4, 9, "You cannot have two variables with the same name.");
    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        "Missing.dj1:4:9 - error LLV1003: You cannot have two variables with the same name."
    );
}

#[test]
fn unknown_positions() {
    let mut reporter = Reporter::new(false);
    let unpositioned = Diagnostic::unpositioned("no sources".to_string(), DiagnosticCategory::Warning, 9001);
    assert_eq!(
        reporter.format_diagnostic(&unpositioned),
        "<unknown> - warning LLV9001: no sources"
    );
    let file_only = Diagnostic::error("A.java", SourceInfo::NONE, "broken".to_string(), 0);
    assert_eq!(reporter.format_diagnostic(&file_only), "A.java - error: broken");
}

#[test]
fn snippet_points_at_the_column() {
    let mut source = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(source, "class A {{").expect("write");
    writeln!(source, "    int x; int x;").expect("write");
    let path = source.path().to_string_lossy().into_owned();

    let mut reporter = Reporter::new(false);
    let rendered = reporter.format_diagnostic(&error(&path, 2, 16, "duplicate"));
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "    2       int x; int x;");
    assert_eq!(lines[2].find('^'), Some(8 + 15));
}

#[test]
fn render_and_summary() {
    let mut reporter = Reporter::new(false);
    let diagnostics = vec![
        error("A.dj1", 1, 1, "first"),
        error("B.dj1", 2, 1, "second"),
    ];
    let rendered = reporter.render(&diagnostics);
    assert_eq!(rendered.lines().count(), 2);
    assert_eq!(reporter.summary(&diagnostics), "Found 2 errors in 2 files.");
    assert_eq!(reporter.summary(&diagnostics[..1]), "Found 1 error.");
    assert_eq!(reporter.summary(&[]), "");
}
