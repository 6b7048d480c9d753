//! # corral
//!
//! Generates Go web applications: `corral new coke`.
//!
//! Startup: load `.env`, parse arguments, install logging, load
//! configuration, dispatch. Every failure funnels through [`report_failure`],
//! which owns the mapping to exit codes:
//!
//! | Code | Meaning                                       |
//! |------|-----------------------------------------------|
//! |  0   | Success                                       |
//! |  1   | Internal error or a failed generator step     |
//! |  2   | Usage error, invalid configuration, cancelled |
//! |  3   | Unknown config key                            |
//! |  4   | Unreadable configuration                      |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // .env may carry CORRAL_* overrides; a missing file is fine
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version arrive here too and must exit 0
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }
    debug!(command = ?cli.command, "corral starting");

    let verbose = cli.global.verbose > 0;
    match load_and_run(cli) {
        Ok(()) => {
            info!("corral finished");
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e, verbose),
    }
}

fn load_and_run(cli: Cli) -> CliResult<()> {
    let config =
        AppConfig::load(cli.global.config.as_ref()).map_err(|e| CliError::ConfigError {
            message: format!("{e:#}"),
            source: Some(e.into()),
        })?;
    let output = OutputManager::new(&cli.global, &config);
    dispatch(cli, config, output)
}

#[instrument(skip_all)]
fn dispatch(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::New(args) => commands::new::execute(args, cli.global, config, output),
        Commands::Init(args) => commands::init::execute(args, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Log, print to stderr, and pick the exit code.
fn report_failure(err: &CliError, verbose: bool) -> ExitCode {
    err.log();
    let rendered = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{rendered}");
    ExitCode::from(err.exit_code())
}
