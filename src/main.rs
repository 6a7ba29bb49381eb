//! composerize-unraid binary: flags and environment in, one result on stdout.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use composerize_unraid::{app, Error};
use composerize_unraid::cli::{usage, Cli};
use composerize_unraid::config::AppConfig;
use composerize_unraid::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match try_main(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn try_main(cli: &Cli) -> anyhow::Result<ExitCode> {
    // Flag combinations are validated here, before any connection is attempted
    let Some(config) =
        AppConfig::from_cli(cli, |key| std::env::var(key).ok()).map_err(Error::from)?
    else {
        eprintln!("No flags provided, printing usage:\n");
        eprintln!("{}", usage());
        return Ok(ExitCode::from(2));
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&config, &mut out)
        .await
        .with_context(|| format!("Request to {} failed", config.remote.display_string()))?;

    Ok(ExitCode::SUCCESS)
}
