//! Expression interpreter bundled with the interaction loop.
//!
//! Evaluates Java-like expressions over `int` (32-bit, wrapping), `double`,
//! `boolean` and `String` values. `&&` and `||` short-circuit. `let name = expr` binds a name, `name = expr` rebinds
//! it, and a trailing `;` evaluates the line without printing its value.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::repl::{EvalError, InterpretError, Interpreter};

/// Deepest expression nesting the parser accepts.
pub const MAX_EXPRESSION_DEPTH: u32 = 256;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "String",
        }
    }

    fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(f64::from(*i)),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) if d.is_nan() => f.write_str("NaN"),
            Value::Double(d) if d.is_infinite() => {
                f.write_str(if *d > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Double(d) if d.fract() == 0.0 && d.abs() < 1e7 => write!(f, "{d:.1}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Int(i64),
    Double(f64),
    Str(String),
    Ident(String),
    Let,
    True,
    False,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Assign,
    EqEq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    AndAnd,
    OrOr,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Int(i) => return write!(f, "{i}"),
            Token::Double(d) => return write!(f, "{d}"),
            Token::Str(s) => return write!(f, "\"{s}\""),
            Token::Ident(name) => return f.write_str(name),
            Token::Let => "let",
            Token::True => "true",
            Token::False => "false",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Bang => "!",
            Token::Assign => "=",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::LParen => "(",
            Token::RParen => ")",
        };
        f.write_str(text)
    }
}

fn scan(text: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(&ch) = chars.get(pos) {
        let next = chars.get(pos + 1).copied();
        pos += 1;
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '=' if next == Some('=') => {
                pos += 1;
                Token::EqEq
            }
            '=' => Token::Assign,
            '!' if next == Some('=') => {
                pos += 1;
                Token::NotEq
            }
            '!' => Token::Bang,
            '<' if next == Some('=') => {
                pos += 1;
                Token::LessEq
            }
            '<' => Token::Less,
            '>' if next == Some('=') => {
                pos += 1;
                Token::GreaterEq
            }
            '>' => Token::Greater,
            '&' if next == Some('&') => {
                pos += 1;
                Token::AndAnd
            }
            '|' if next == Some('|') => {
                pos += 1;
                Token::OrOr
            }
            '"' => {
                let start = pos;
                while chars.get(pos).is_some_and(|&c| c != '"') {
                    pos += 1;
                }
                if pos >= chars.len() {
                    return Err(EvalError::new("Syntax error: unterminated string literal"));
                }
                let literal = chars[start..pos].iter().collect();
                pos += 1;
                Token::Str(literal)
            }
            c if c.is_ascii_digit() => {
                let start = pos - 1;
                while chars.get(pos).is_some_and(|c| c.is_ascii_digit()) {
                    pos += 1;
                }
                let is_double = chars.get(pos) == Some(&'.')
                    && chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit());
                if is_double {
                    pos += 1;
                    while chars.get(pos).is_some_and(|c| c.is_ascii_digit()) {
                        pos += 1;
                    }
                }
                let literal: String = chars[start..pos].iter().collect();
                if is_double {
                    let value = literal
                        .parse()
                        .map_err(|_| EvalError::new(format!("Malformed number {literal}")))?;
                    Token::Double(value)
                } else {
                    let value = literal.parse().map_err(|_| {
                        EvalError::new(format!("Integer number too large: {literal}"))
                    })?;
                    Token::Int(value)
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = pos - 1;
                while chars
                    .get(pos)
                    .is_some_and(|&c| c.is_alphanumeric() || c == '_' || c == '$')
                {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                match word.as_str() {
                    "let" => Token::Let,
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Ident(word),
                }
            }
            other => {
                return Err(EvalError::new(format!("Unexpected character '{other}'")));
            }
        };
        tokens.push(token);
    }
    Ok(tokens)
}

// =============================================================================
// Parser and evaluator
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinOp {
    fn from_token(token: &Token) -> Option<(BinOp, u8)> {
        Some(match token {
            Token::OrOr => (BinOp::Or, 1),
            Token::AndAnd => (BinOp::And, 2),
            Token::EqEq => (BinOp::Eq, 3),
            Token::NotEq => (BinOp::NotEq, 3),
            Token::Less => (BinOp::Less, 4),
            Token::LessEq => (BinOp::LessEq, 4),
            Token::Greater => (BinOp::Greater, 4),
            Token::GreaterEq => (BinOp::GreaterEq, 4),
            Token::Plus => (BinOp::Add, 5),
            Token::Minus => (BinOp::Sub, 5),
            Token::Star => (BinOp::Mul, 6),
            Token::Slash => (BinOp::Div, 6),
            Token::Percent => (BinOp::Rem, 6),
            _ => return None,
        })
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: u32,
    /// Cleared while parsing the operand a short-circuit skips.
    live: bool,
    bindings: &'a FxHashMap<String, Value>,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(EvalError::new(format!("Syntax error: unexpected '{token}'"))),
        }
    }

    fn expression(&mut self, min_precedence: u8) -> Result<Value, InterpretError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(InterpretError::Internal(anyhow::anyhow!(
                "expression nested more than {MAX_EXPRESSION_DEPTH} levels deep"
            )));
        }
        let mut left = self.unary()?;
        while let Some((op, precedence)) = self.peek().and_then(BinOp::from_token) {
            if precedence < min_precedence {
                break;
            }
            self.pos += 1;
            let skips = matches!(
                (op, &left),
                (BinOp::And, Value::Bool(false)) | (BinOp::Or, Value::Bool(true))
            );
            if skips {
                // The right operand is parsed but never evaluated.
                let live = std::mem::replace(&mut self.live, false);
                self.expression(precedence + 1)?;
                self.live = live;
                continue;
            }
            let right = self.expression(precedence + 1)?;
            if self.live {
                left = binary(op, left, right)?;
            }
        }
        self.depth -= 1;
        Ok(left)
    }

    /// Prefix operators are collected first and applied innermost-out, so a
    /// long run of them does not recurse.
    fn unary(&mut self) -> Result<Value, InterpretError> {
        let mut prefixes = Vec::new();
        while let Some(prefix) = self
            .peek()
            .filter(|t| matches!(t, Token::Minus | Token::Bang))
            .cloned()
        {
            prefixes.push(prefix);
            self.pos += 1;
        }
        // `-2147483648` is the one int literal outside the positive range.
        let min_int_literal = matches!(prefixes.last(), Some(Token::Minus))
            && matches!(self.peek(), Some(&Token::Int(i)) if i == -i64::from(i32::MIN));
        let mut value = if min_int_literal {
            prefixes.pop();
            self.pos += 1;
            Value::Int(i32::MIN)
        } else {
            self.primary()?
        };
        if !self.live {
            return Ok(value);
        }
        for prefix in prefixes.iter().rev() {
            value = match (prefix, value) {
                (Token::Minus, Value::Int(i)) => Value::Int(i.wrapping_neg()),
                (Token::Minus, Value::Double(d)) => Value::Double(-d),
                (Token::Bang, Value::Bool(b)) => Value::Bool(!b),
                (prefix, other) => return Err(bad_operand(&prefix.to_string(), &other).into()),
            };
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, InterpretError> {
        let bindings = self.bindings;
        let live = self.live;
        match self.advance().cloned() {
            Some(Token::Int(i)) => i32::try_from(i)
                .map(Value::Int)
                .map_err(|_| EvalError::new(format!("Integer number too large: {i}")).into()),
            Some(Token::Double(d)) => Ok(Value::Double(d)),
            Some(Token::Str(s)) => Ok(Value::Str(s)),
            Some(Token::True) => Ok(Value::Bool(true)),
            Some(Token::False) => Ok(Value::Bool(false)),
            Some(Token::Ident(name)) => match bindings.get(&name) {
                Some(value) => Ok(value.clone()),
                // A skipped operand is only parsed.
                None if !live => Ok(Value::Bool(false)),
                None => Err(EvalError::new(format!("Undefined name '{name}'")).into()),
            },
            Some(Token::LParen) => {
                let value = self.expression(0)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(EvalError::new("Syntax error: expected ')'").into()),
                }
            }
            Some(token) => Err(EvalError::new(format!("Syntax error: unexpected '{token}'")).into()),
            None => Err(EvalError::new("Syntax error: unexpected end of input").into()),
        }
    }
}

fn bad_operand(op: &str, value: &Value) -> EvalError {
    EvalError::new(format!(
        "Bad operand type {} for unary operator '{op}'",
        value.type_name()
    ))
}

fn bad_operands(op: BinOp, left: &Value, right: &Value) -> EvalError {
    EvalError::new(format!(
        "Bad operand types for binary operator '{}': {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn binary(op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
    use Value::{Bool, Double, Int, Str};

    if op == BinOp::Add {
        match (&left, &right) {
            (Str(l), r) => return Ok(Str(format!("{l}{}", unquoted(r)))),
            (l, Str(r)) => return Ok(Str(format!("{}{r}", unquoted(l)))),
            _ => {}
        }
    }

    match (op, &left, &right) {
        (BinOp::And, Bool(l), Bool(r)) => Ok(Bool(*l && *r)),
        (BinOp::Or, Bool(l), Bool(r)) => Ok(Bool(*l || *r)),
        (BinOp::Eq, Bool(l), Bool(r)) => Ok(Bool(l == r)),
        (BinOp::NotEq, Bool(l), Bool(r)) => Ok(Bool(l != r)),
        (BinOp::Eq, Str(l), Str(r)) => Ok(Bool(l == r)),
        (BinOp::NotEq, Str(l), Str(r)) => Ok(Bool(l != r)),
        (_, Int(l), Int(r)) => int_binary(op, *l, *r).ok_or_else(|| bad_operands(op, &left, &right))?,
        _ => match (left.as_double(), right.as_double()) {
            (Some(l), Some(r)) => double_binary(op, l, r).ok_or_else(|| bad_operands(op, &left, &right)),
            _ => Err(bad_operands(op, &left, &right)),
        },
    }
}

/// `None` when `op` does not apply to ints.
fn int_binary(op: BinOp, l: i32, r: i32) -> Option<Result<Value, EvalError>> {
    let divide_by_zero = || Err(EvalError::new("java.lang.ArithmeticException: / by zero"));
    Some(match op {
        BinOp::Add => Ok(Value::Int(l.wrapping_add(r))),
        BinOp::Sub => Ok(Value::Int(l.wrapping_sub(r))),
        BinOp::Mul => Ok(Value::Int(l.wrapping_mul(r))),
        BinOp::Div if r == 0 => divide_by_zero(),
        BinOp::Div => Ok(Value::Int(l.wrapping_div(r))),
        BinOp::Rem if r == 0 => divide_by_zero(),
        BinOp::Rem => Ok(Value::Int(l.wrapping_rem(r))),
        BinOp::Eq => Ok(Value::Bool(l == r)),
        BinOp::NotEq => Ok(Value::Bool(l != r)),
        BinOp::Less => Ok(Value::Bool(l < r)),
        BinOp::LessEq => Ok(Value::Bool(l <= r)),
        BinOp::Greater => Ok(Value::Bool(l > r)),
        BinOp::GreaterEq => Ok(Value::Bool(l >= r)),
        BinOp::And | BinOp::Or => return None,
    })
}

fn double_binary(op: BinOp, l: f64, r: f64) -> Option<Value> {
    Some(match op {
        BinOp::Add => Value::Double(l + r),
        BinOp::Sub => Value::Double(l - r),
        BinOp::Mul => Value::Double(l * r),
        BinOp::Div => Value::Double(l / r),
        BinOp::Rem => Value::Double(l % r),
        BinOp::Eq => Value::Bool(l == r),
        BinOp::NotEq => Value::Bool(l != r),
        BinOp::Less => Value::Bool(l < r),
        BinOp::LessEq => Value::Bool(l <= r),
        BinOp::Greater => Value::Bool(l > r),
        BinOp::GreaterEq => Value::Bool(l >= r),
        BinOp::And | BinOp::Or => return None,
    })
}

fn unquoted(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Interpreter
// =============================================================================

/// Evaluates one line at a time, keeping `let` bindings between lines.
#[derive(Debug, Default)]
pub struct ExpressionInterpreter {
    bindings: FxHashMap<String, Value>,
}

impl ExpressionInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Evaluate `line`, returning its value (`None` for bindings and empty lines).
    pub fn evaluate(&mut self, line: &str) -> Result<Option<Value>, InterpretError> {
        let (line, silent) = match line.trim().strip_suffix(';') {
            Some(statement) => (statement, true),
            None => (line.trim(), false),
        };
        let tokens = scan(line)?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let value = match tokens.as_slice() {
            [Token::Let, Token::Ident(name), Token::Assign, rest @ ..] => {
                let value = self.evaluate_tokens(rest)?;
                self.bindings.insert(name.clone(), value);
                return Ok(None);
            }
            [Token::Let, ..] => {
                return Err(EvalError::new("Syntax error: expected 'let name = value'").into());
            }
            [Token::Ident(name), Token::Assign, rest @ ..] => {
                if !self.bindings.contains_key(name) {
                    return Err(EvalError::new(format!("Undefined name '{name}'")).into());
                }
                let value = self.evaluate_tokens(rest)?;
                self.bindings.insert(name.clone(), value.clone());
                value
            }
            tokens => self.evaluate_tokens(tokens)?,
        };
        Ok(if silent { None } else { Some(value) })
    }

    fn evaluate_tokens(&self, tokens: &[Token]) -> Result<Value, InterpretError> {
        let mut evaluator = Evaluator {
            tokens,
            pos: 0,
            depth: 0,
            live: true,
            bindings: &self.bindings,
        };
        let value = evaluator.expression(0)?;
        evaluator.expect_end()?;
        Ok(value)
    }
}

impl Interpreter for ExpressionInterpreter {
    fn interpret(&mut self, line: &str) -> Result<Option<String>, InterpretError> {
        Ok(self.evaluate(line)?.map(|value| value.to_string()))
    }
}
