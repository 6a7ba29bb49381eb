//! Host key verification against an OpenSSH `known_hosts` file.

use std::path::{Path, PathBuf};

use russh::client;
use russh::keys::check_known_hosts_path;
use russh::keys::ssh_key::PublicKey;
use tracing::{debug, warn};

use super::error::SshError;

/// russh client handler that accepts a server only if its key is listed in
/// `known_hosts` for the dialed host and port.
#[derive(Debug, Clone)]
pub struct KnownHostsVerifier {
    host: String,
    port: u16,
    known_hosts_path: PathBuf,
}

impl KnownHostsVerifier {
    /// Open the store and build a verifier for `host:port`.
    ///
    /// The file is read eagerly so an unreadable store is reported before dialing.
    pub async fn load(host: &str, port: u16, known_hosts_path: &Path) -> Result<Self, SshError> {
        tokio::fs::read(known_hosts_path)
            .await
            .map_err(|source| SshError::KnownHosts {
                path: known_hosts_path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            host: host.to_string(),
            port,
            known_hosts_path: known_hosts_path.to_path_buf(),
        })
    }
}

impl client::Handler for KnownHostsVerifier {
    type Error = russh::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        match check_known_hosts_path(
            &self.host,
            self.port,
            server_public_key,
            &self.known_hosts_path,
        ) {
            Ok(true) => {
                debug!("[ssh] Host key for {}:{} verified", self.host, self.port);
                Ok(true)
            }
            Ok(false) => {
                warn!(
                    "[ssh] Host key for {}:{} not found in {}",
                    self.host,
                    self.port,
                    self.known_hosts_path.display()
                );
                Ok(false)
            }
            Err(e) => {
                warn!(
                    "[ssh] Host key verification failed for {}:{}: {}",
                    self.host, self.port, e
                );
                Ok(false)
            }
        }
    }
}
