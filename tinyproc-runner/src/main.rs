mod printer;
mod repl;
mod runner;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tinyproc_interpreter::evaluator::DEFAULT_MAX_CALL_DEPTH;
use tinyproc_interpreter::io::StdinSource;

use session::Session;

/// What to do once a block fails with a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Report the error and exit with a failure status
    Terminate,
    /// Report the error and continue with the next block
    AbortBlock,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Program to run. Starts the REPL when omitted
    path: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Terminate)]
    on_error: ErrorPolicy,
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut session = Session::new(
        StdinSource::new(),
        std::io::stdout(),
        cli.on_error,
        cli.max_call_depth,
    );
    match cli.path {
        None => repl::start(session),
        Some(path) => runner::execute(&path, &mut session),
    }
}
