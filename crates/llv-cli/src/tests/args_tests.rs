use clap::Parser;
use std::path::PathBuf;

use super::args::{CliArgs, Command, DuplicateScopeArg, Level, OutputFormat};
use llv_binder::DuplicateScope;
use llv_checker::LanguageLevel;

#[test]
fn parses_check_defaults() {
    let args = CliArgs::try_parse_from(["llv", "check", "trees"]).expect("check should parse");
    let Command::Check(check) = args.command else {
        panic!("expected check command");
    };
    assert_eq!(check.inputs, vec![PathBuf::from("trees")]);
    assert_eq!(check.level, None);
    assert_eq!(check.format, OutputFormat::Text);
    assert_eq!(check.duplicate_scope, DuplicateScopeArg::Immediate);
    assert!(!check.no_color);

    let options = check.checker_options();
    assert_eq!(options.duplicate_scope, DuplicateScope::Immediate);
    assert_eq!(options.max_visit_depth, llv_common::limits::MAX_VISIT_DEPTH);
}

#[test]
fn parses_check_flags() {
    let args = CliArgs::try_parse_from([
        "llv",
        "check",
        "--level",
        "dj1",
        "--format",
        "json",
        "--duplicate-scope",
        "enclosing",
        "--max-depth",
        "40",
        "a.json",
        "b.json",
    ])
    .expect("flagged check should parse");
    let Command::Check(check) = args.command else {
        panic!("expected check command");
    };
    assert_eq!(check.level, Some(Level::Intermediate));
    assert_eq!(LanguageLevel::from(Level::Intermediate), LanguageLevel::Intermediate);
    assert_eq!(check.format, OutputFormat::Json);
    assert_eq!(check.inputs.len(), 2);

    let options = check.checker_options();
    assert_eq!(options.duplicate_scope, DuplicateScope::EnclosingBodies);
    assert_eq!(options.max_visit_depth, 40);
}

#[test]
fn check_requires_an_input() {
    assert!(CliArgs::try_parse_from(["llv", "check"]).is_err());
}

#[test]
fn parses_repl_aliases() {
    let args = CliArgs::try_parse_from(["llv", "repl", "--cp", "lib:classes;extra", "-b"])
        .expect("repl should parse");
    let Command::Repl(repl) = args.command else {
        panic!("expected repl command");
    };
    assert!(repl.batch);
    assert_eq!(
        repl.classpath_entries(),
        vec![
            PathBuf::from("lib"),
            PathBuf::from("classes"),
            PathBuf::from("extra")
        ]
    );

    let args = CliArgs::try_parse_from(["llv", "repl"]).expect("bare repl should parse");
    let Command::Repl(repl) = args.command else {
        panic!("expected repl command");
    };
    assert!(!repl.batch);
    assert!(repl.classpath_entries().is_empty());
}
