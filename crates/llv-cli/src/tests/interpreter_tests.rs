use super::interpreter::{ExpressionInterpreter, MAX_EXPRESSION_DEPTH, Value};
use super::repl::{InterpretError, Interpreter};

fn eval(line: &str) -> Result<Option<Value>, InterpretError> {
    ExpressionInterpreter::new().evaluate(line)
}

fn value(line: &str) -> Value {
    match eval(line) {
        Ok(Some(value)) => value,
        other => panic!("{line}: expected a value, got {other:?}"),
    }
}

fn eval_error(line: &str) -> String {
    match eval(line) {
        Err(InterpretError::Eval(err)) => err.message().to_string(),
        other => panic!("{line}: expected an evaluation error, got {other:?}"),
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(value("1+1"), Value::Int(2));
    assert_eq!(value("2 + 3 * 4"), Value::Int(14));
    assert_eq!(value("(2 + 3) * 4"), Value::Int(20));
    assert_eq!(value("10 - 4 - 3"), Value::Int(3));
    assert_eq!(value("7 / 2"), Value::Int(3));
    assert_eq!(value("-7 % 3"), Value::Int(-1));
    assert_eq!(value("1.5 * 2"), Value::Double(3.0));
}

#[test]
fn test_comparison_and_logic() {
    assert_eq!(value("1 < 2 && 2 <= 2"), Value::Bool(true));
    assert_eq!(value("!(3 == 3) || 1.0 != 1"), Value::Bool(false));
    assert_eq!(value("\"a\" == \"a\""), Value::Bool(true));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(value("\"x = \" + 1 + 2"), Value::Str("x = 12".to_string()));
    assert_eq!(value("1 + 2 + \"!\""), Value::Str("3!".to_string()));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Int(2).to_string(), "2");
    assert_eq!(Value::Double(3.0).to_string(), "3.0");
    assert_eq!(Value::Double(0.25).to_string(), "0.25");
    assert_eq!(Value::Double(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Str("hi".to_string()).to_string(), "\"hi\"");
}

#[test]
fn test_bindings_persist_between_lines() {
    let mut interpreter = ExpressionInterpreter::new();
    assert_eq!(interpreter.interpret("let x = 40").expect("binding"), None);
    assert_eq!(interpreter.interpret("x + 2").expect("use"), Some("42".to_string()));
    assert_eq!(interpreter.interpret("x = x * 2").expect("rebind"), Some("80".to_string()));
    assert_eq!(interpreter.binding("x"), Some(&Value::Int(80)));
}

#[test]
fn test_trailing_semicolon_suppresses_the_value() {
    let mut interpreter = ExpressionInterpreter::new();
    assert_eq!(interpreter.interpret("1 + 1;").expect("statement"), None);
    assert_eq!(interpreter.interpret("").expect("empty"), None);
    assert_eq!(interpreter.interpret("   ").expect("blank"), None);
}

#[test]
fn test_user_errors() {
    assert_eq!(eval_error("y + 1"), "Undefined name 'y'");
    assert_eq!(eval_error("y = 1"), "Undefined name 'y'");
    assert_eq!(eval_error("1 / 0"), "java.lang.ArithmeticException: / by zero");
    assert_eq!(
        eval_error("true + 1"),
        "Bad operand types for binary operator '+': boolean and int"
    );
    assert_eq!(eval_error("-true"), "Bad operand type boolean for unary operator '-'");
    assert_eq!(eval_error("(1 + 2"), "Syntax error: expected ')'");
    assert_eq!(eval_error("1 2"), "Syntax error: unexpected '2'");
    assert_eq!(eval_error("1 +"), "Syntax error: unexpected end of input");
    assert_eq!(eval_error("1 # 2"), "Unexpected character '#'");
    assert_eq!(eval_error("\"open"), "Syntax error: unterminated string literal");
}

#[test]
fn test_deep_nesting_is_an_internal_fault() {
    let depth = MAX_EXPRESSION_DEPTH as usize + 10;
    let line = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(matches!(eval(&line), Err(InterpretError::Internal(_))));
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_eq!(value("false && 1 / 0 == 0"), Value::Bool(false));
    assert_eq!(value("true || missing"), Value::Bool(true));
    assert_eq!(value("1 > 2 && (1 / 0 == 0 || true)"), Value::Bool(false));
    assert_eq!(eval_error("true && 1 / 0 == 0"), "java.lang.ArithmeticException: / by zero");
    assert_eq!(eval_error("false || missing"), "Undefined name 'missing'");
}

#[test]
fn test_int_arithmetic_wraps_at_32_bits() {
    assert_eq!(value("2147483647 + 1"), Value::Int(i32::MIN));
    assert_eq!(value("-2147483648"), Value::Int(i32::MIN));
    assert_eq!(value("-2147483648 - 1"), Value::Int(i32::MAX));
    assert_eq!(value("65536 * 65536"), Value::Int(0));
    assert_eq!(eval_error("2147483648"), "Integer number too large: 2147483648");
}

#[test]
fn test_long_prefix_run_is_not_recursive() {
    let line = format!("{}1", "-".repeat(200_001));
    assert_eq!(value(&line), Value::Int(-1));
    let line = format!("{}true", "!".repeat(100_000));
    assert_eq!(value(&line), Value::Bool(true));
}
