//! Interaction loop: read a line, evaluate it, print the result.

use std::any::Any;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const PROMPT: &str = "> ";
pub const INTERNAL_ERROR_BANNER: &str = "INTERNAL ERROR: Uncaught exception";

/// A failure the user caused; only its message is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

#[derive(Debug)]
pub enum InterpretError {
    Eval(EvalError),
    /// A fault in the interpreter itself.
    Internal(anyhow::Error),
}

impl From<EvalError> for InterpretError {
    fn from(err: EvalError) -> Self {
        InterpretError::Eval(err)
    }
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretError::Eval(err) => err.fmt(f),
            InterpretError::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for InterpretError {}

/// Evaluates one input line. `Ok(None)` means the line produced no value.
pub trait Interpreter {
    fn interpret(&mut self, line: &str) -> Result<Option<String>, InterpretError>;
}

#[derive(Clone, Debug)]
pub struct ReplOptions {
    pub classpath: Vec<PathBuf>,
    /// Echo each line after the prompt instead of prompting before reading.
    pub batch: bool,
    pub working_dir: PathBuf,
}

impl ReplOptions {
    /// Options for `working_dir`; the class path defaults to it.
    pub fn new(working_dir: PathBuf) -> Self {
        ReplOptions {
            classpath: vec![working_dir.clone()],
            batch: false,
            working_dir,
        }
    }
}

pub struct Repl<I> {
    interpreter: I,
    options: ReplOptions,
}

impl<I: Interpreter> Repl<I> {
    pub fn new(interpreter: I, options: ReplOptions) -> Self {
        Repl {
            interpreter,
            options,
        }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    pub fn options(&self) -> &ReplOptions {
        &self.options
    }

    pub fn banner(&self) -> String {
        format!(
            "Welcome to the llv interactions pane.\nWorking directory is {}",
            self.options.working_dir.display()
        )
    }

    /// Run until `input` reaches end of stream.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.banner())?;
        debug!(classpath = ?self.options.classpath, batch = self.options.batch, "interaction loop started");

        let mut line = String::new();
        loop {
            if !self.options.batch {
                write!(output, "{PROMPT}")?;
                output.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let text = line.trim_end_matches(['\n', '\r']);
            if self.options.batch {
                writeln!(output, "{PROMPT}{text}")?;
            }
            self.interpret_line(text, &mut output)?;
        }
        output.flush()
    }

    fn interpret_line<W: Write>(&mut self, text: &str, output: &mut W) -> io::Result<()> {
        let interpreter = &mut self.interpreter;
        let result = panic::catch_unwind(AssertUnwindSafe(|| interpreter.interpret(text)));
        match result {
            Ok(Ok(Some(value))) => writeln!(output, "{value}"),
            Ok(Ok(None)) => Ok(()),
            Ok(Err(InterpretError::Eval(err))) => writeln!(output, "{err}"),
            Ok(Err(InterpretError::Internal(err))) => {
                warn!(%err, "interpreter fault");
                writeln!(output, "{INTERNAL_ERROR_BANNER}")?;
                writeln!(output, "{err:?}")
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "interpreter panicked");
                writeln!(output, "{INTERNAL_ERROR_BANNER}")?;
                writeln!(output, "panicked: {message}")
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
