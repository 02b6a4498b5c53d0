//! Command-line front end for the llv analyzer.
//!
//! - `llv check`: load JSON syntax trees, run one batch, report diagnostics
//! - `llv repl`: line-at-a-time interaction loop
//!
//! [`compiler_reporter`] adapts diagnostics from an external compiler into
//! the same record type the analyzer produces.

pub mod args;
pub mod compiler_reporter;
pub mod driver;
pub mod interpreter;
pub mod reporter;
pub mod repl;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/compiler_reporter_tests.rs"]
mod compiler_reporter_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/interpreter_tests.rs"]
mod interpreter_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod repl_tests;
