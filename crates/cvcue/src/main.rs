mod cli;
mod error;
mod output;

use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cvcue_api::CueClient;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::Printer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.verbose);

    // Run and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries the inventory; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_file = cli.config.clone().unwrap_or_else(cvcue_config::config_path);
    let config = cvcue_config::load_config(cli.config.as_deref(), &cli.overrides())
        .map_err(|e| CliError::config(e, &config_file))?;
    let client_config =
        cvcue_config::to_client_config(&config).map_err(|e| CliError::config(e, &config_file))?;
    let client = CueClient::from_config(&client_config)?;
    let page_size = client_config.page_size;

    let mut printer = Printer::new(cli.output, io::stdout().lock());

    client
        .with_session(&client_config.credentials, async |session| {
            printer.drain(client.fetch_all(session, page_size)).await
        })
        .await?;

    let count = printer.count();
    if let Err(err) = printer.finish() {
        if !err.is_broken_pipe() {
            return Err(err);
        }
    }

    info!(count, "inventory complete");
    Ok(())
}
