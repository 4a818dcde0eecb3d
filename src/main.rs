mod cli;
mod commands;
mod util;

use std::process::ExitCode;

use anyhow::{Error, Result};
use clap::Parser;
use legis::SyntaxFailure;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

const LOG_ENV: &str = "LEGIS_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    install_subscriber();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
    }
}

fn report(err: &Error) {
    match err.downcast_ref::<SyntaxFailure>() {
        Some(failure) => error!(
            error = %err,
            line = failure.line,
            column = failure.column,
            rules = %failure.rule_stack.join(" > "),
            "text did not parse"
        ),
        None => error!(error = %err, "command failed"),
    }

    for cause in err.chain().skip(1) {
        error!(cause = %cause, "caused by");
    }
}

fn install_subscriber() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
