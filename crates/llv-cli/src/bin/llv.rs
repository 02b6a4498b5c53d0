use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use llv_cli::args::{CheckArgs, CliArgs, Command, OutputFormat, ReplArgs};
use llv_cli::driver;
use llv_cli::interpreter::ExpressionInterpreter;
use llv_cli::repl::{Repl, ReplOptions};
use llv_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERRORS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    if llv::tracing_config::init_tracing() {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "llv starting");
    }

    let args = CliArgs::parse();
    let code = match args.command {
        Command::Check(check) => run_check(&check)?,
        Command::Repl(repl) => run_repl(&repl)?,
    };
    std::process::exit(code);
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    let result = driver::check(args)?;
    let diagnostics = &result.analysis.diagnostics;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, diagnostics)
                .context("failed to serialize diagnostics")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            let mut reporter = Reporter::new(color);
            if !diagnostics.is_empty() {
                writeln!(out, "{}", reporter.render(diagnostics))?;
                writeln!(out)?;
                writeln!(out, "{}", reporter.summary(diagnostics))?;
            }
        }
    }

    Ok(if result.has_errors() {
        EXIT_ERRORS_REPORTED
    } else {
        EXIT_SUCCESS
    })
}

fn run_repl(args: &ReplArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let mut options = ReplOptions::new(cwd);
    let classpath = args.classpath_entries();
    if !classpath.is_empty() {
        options.classpath = classpath;
    }
    options.batch = args.batch;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Repl::new(ExpressionInterpreter::new(), options)
        .run(stdin.lock(), stdout.lock())
        .context("interaction loop failed")?;
    Ok(EXIT_SUCCESS)
}
