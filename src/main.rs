mod cache;
mod cli;
mod constants;
mod deserialise;
mod download;
mod error;
mod reading;
mod report;

use std::process::ExitCode;

use clap::Parser;
use cli::{command, setup_logging, Cli};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match command::run(&cli).await {
        Ok(()) => {
            debug!("Exiting normally.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Exiting due to error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
