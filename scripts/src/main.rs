use std::process::ExitCode;

use clap::Parser;
use scripts::cli::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { command } = Cli::parse();

    // Logs go to stderr, stdout is reserved for the deployer's result line
    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .init();

    match command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
