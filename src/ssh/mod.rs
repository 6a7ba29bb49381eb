//! SSH Transport Module
//!
//! Authenticated remote command execution on a single host.
//!
//! - Public key auth with an unencrypted OpenSSH key
//! - Server key checked against an OpenSSH `known_hosts` file
//! - Each command gets its own exec channel; stdout is returned as text

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod known_hosts;
mod quote;
mod session;

use async_trait::async_trait;

pub use error::SshError;
pub use known_hosts::KnownHostsVerifier;
pub use quote::quote_arg;
pub use session::Session;

/// Something that runs one shell command line and returns its stdout.
///
/// The command is passed to the remote shell verbatim: callers quote any
/// interpolated values with [`quote_arg`].
#[async_trait]
pub trait RemoteExec: Send + Sync {
    async fn run(&self, command: &str) -> Result<String, SshError>;
}
