//! Command-line surface
//!
//! Flags only; validation of flag combinations lives in [`crate::config`].

use clap::{CommandFactory, Parser};

/// Generate a docker-compose.yml for a container running on a remote Docker host
#[derive(Debug, Default, Parser)]
#[command(name = "composerize-unraid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Generate a docker-compose.yml for a container running on a remote Docker host",
    long_about = None
)]
#[command(after_help = "Environment:\n  \
    HOST      remote address (required unless --host is given)\n  \
    PORT      remote SSH port (default 22)\n  \
    USERNAME  remote login user (default root)\n  \
    HOME      private key ~/.ssh/id_ed25519, known hosts ~/.ssh/known_hosts")]
pub struct Cli {
    /// List running containers by name
    #[arg(long)]
    pub list: bool,

    /// List all containers (including stopped) by id
    #[arg(long)]
    pub ids: bool,

    /// Output docker-compose.yml contents for the container with id <ID>
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Output docker-compose.yml contents for the container with name <NAME>
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Remote host (overrides the HOST environment variable)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Usage text printed when no action flag is given.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
