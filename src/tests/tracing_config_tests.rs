use crate::tracing_config::{LogConfig, LogFormat, scoped_directives};

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
}

#[test]
fn test_nothing_requested() {
    assert_eq!(LogConfig::from_vars(None, None, Some("tree")), None);
}

#[test]
fn test_bare_level_is_scoped_to_llv_crates() {
    let directives = scoped_directives("DEBUG");
    assert!(directives.starts_with("warn,"), "{directives}");
    assert!(directives.contains("llv_checker=debug"));
    assert!(directives.contains("llv_cli=debug"));
    assert!(!directives.contains("DEBUG"));
}

#[test]
fn test_explicit_directives_are_kept() {
    let value = "llv_checker::walker=trace,llv_binder=debug";
    assert_eq!(scoped_directives(value), value);
}

#[test]
fn test_llv_log_takes_precedence() {
    let config = LogConfig::from_vars(Some("info"), Some("trace"), Some("json")).expect("config");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.directives.contains("llv=info"));

    let config = LogConfig::from_vars(None, Some(" trace "), None).expect("config");
    assert_eq!(config.directives, "trace");
    assert_eq!(config.format, LogFormat::Text);
}
