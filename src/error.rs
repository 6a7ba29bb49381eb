//! Crate-level error
//!
//! Every failure is fatal; lower layers return their own error enums and this
//! type carries them up to the single handler in `main`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::docker::DockerError;
use crate::pipeline::ToolError;
use crate::ssh::SshError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ssh(#[from] SshError),

    #[error(transparent)]
    Docker(#[from] DockerError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
