//! SSH error types

use std::path::PathBuf;

use thiserror::Error;

/// Hint appended to connection failures; most of them come from a missing
/// authorized key or a wrong login user.
const CONNECT_HINT: &str = "Did you set USERNAME? (defaults to root) \
Did you configure the local SSH public key on the remote host?";

/// SSH transport errors
#[derive(Debug, Error)]
pub enum SshError {
    #[error("Unable to read SSH private key {}: {source}", .path.display())]
    AuthKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse SSH private key {}: {reason}", .path.display())]
    KeyParse { path: PathBuf, reason: String },

    #[error("Unable to read known_hosts file {}: {source}", .path.display())]
    KnownHosts {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to connect to SSH server {target}: {reason}.\n{hint}", hint = CONNECT_HINT)]
    Connection { target: String, reason: String },

    #[error("Public key authentication rejected for {user}@{target}.\n{hint}", hint = CONNECT_HINT)]
    AuthRejected { user: String, target: String },

    #[error("SSH channel error: {0}")]
    Channel(String),

    #[error("Remote command `{command}` exited with status {status}")]
    CommandFailed { command: String, status: u32 },

    #[error("Remote command `{command}` exited without reporting a status")]
    MissingExitStatus { command: String },
}
