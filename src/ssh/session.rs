//! SSH Session: one authenticated connection, one exec channel per command
//!
//! ```text
//! connect ──▸ run(cmd) ──▸ run(cmd) ──▸ close
//!               │            │
//!          open channel  open channel
//!          exec + drain  exec + drain
//!          close channel close channel
//! ```
//!
//! A fresh channel per command keeps working directory and environment from
//! leaking between commands. Commands run strictly one after another.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::keys::{decode_secret_key, Algorithm, PrivateKey, PrivateKeyWithHashAlg};
use russh::{ChannelMsg, Disconnect, Preferred};
use tracing::{debug, info};

use super::error::SshError;
use super::known_hosts::KnownHostsVerifier;
use super::RemoteExec;
use crate::config::RemoteHost;

/// Host key algorithms offered to the server.
const HOST_KEY_ALGORITHMS: &[Algorithm] = &[Algorithm::Ed25519];

/// A live, authenticated connection to one [`RemoteHost`].
pub struct Session {
    handle: Handle<KnownHostsVerifier>,
    target: String,
}

impl Session {
    /// Load credentials, dial, verify the host key and authenticate.
    pub async fn connect(remote: &RemoteHost) -> Result<Self, SshError> {
        let key = load_private_key(&remote.private_key_path).await?;
        let verifier =
            KnownHostsVerifier::load(&remote.address, remote.port, &remote.known_hosts_path)
                .await?;

        let target = remote.target();
        let config = Arc::new(client::Config {
            preferred: Preferred {
                key: Cow::Borrowed(HOST_KEY_ALGORITHMS),
                ..Default::default()
            },
            ..Default::default()
        });

        info!("[ssh] Connecting to {}", remote.display_string());
        let mut handle = client::connect(config, (remote.address.as_str(), remote.port), verifier)
            .await
            .map_err(|e| SshError::Connection {
                target: target.clone(),
                reason: e.to_string(),
            })?;

        let hash_alg = handle
            .best_supported_rsa_hash()
            .await
            .map_err(|e| SshError::Connection {
                target: target.clone(),
                reason: e.to_string(),
            })?
            .flatten();

        let auth = handle
            .authenticate_publickey(
                remote.user.as_str(),
                PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
            )
            .await
            .map_err(|e| SshError::Connection {
                target: target.clone(),
                reason: e.to_string(),
            })?;

        if !auth.success() {
            return Err(SshError::AuthRejected {
                user: remote.user.clone(),
                target,
            });
        }

        info!("[ssh] Authenticated as {}", remote.display_string());
        Ok(Self { handle, target })
    }

    /// Disconnect. Consumes the session, so it can only happen once.
    pub async fn close(self) {
        if let Err(e) = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
        {
            debug!("[ssh] Disconnect from {} failed: {}", self.target, e);
        }
    }

    async fn exec_on(
        channel: &mut russh::Channel<client::Msg>,
        command: &str,
    ) -> Result<String, SshError> {
        channel
            .exec(true, command)
            .await
            .map_err(|e| SshError::Channel(format!("Failed to exec: {}", e)))?;

        let mut output = ExecOutput::default();
        while let Some(msg) = channel.wait().await {
            output.feed(msg);
        }
        output.into_result(command)
    }
}

#[async_trait]
impl RemoteExec for Session {
    async fn run(&self, command: &str) -> Result<String, SshError> {
        debug!("[ssh] Running on {}: {}", self.target, command);

        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| SshError::Channel(format!("Failed to open session channel: {}", e)))?;

        let result = Self::exec_on(&mut channel, command).await;

        // The server usually closed it already; this covers the error paths.
        if let Err(e) = channel.close().await {
            debug!("[ssh] Channel close: {}", e);
        }

        if let Err(ref e) = result {
            debug!("[ssh] {}", e);
        }
        result
    }
}

/// What one exec channel produced before it closed.
#[derive(Debug, Default)]
struct ExecOutput {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_status: Option<u32>,
}

impl ExecOutput {
    fn feed(&mut self, msg: ChannelMsg) {
        match msg {
            ChannelMsg::Data { data } => self.stdout.extend_from_slice(&data),
            ChannelMsg::ExtendedData { data, ext: 1 } => self.stderr.extend_from_slice(&data),
            ChannelMsg::ExitStatus { exit_status } => self.exit_status = Some(exit_status),
            _ => {}
        }
    }

    /// Stdout on exit status 0. Stderr only goes to the debug log.
    fn into_result(self, command: &str) -> Result<String, SshError> {
        if !self.stderr.is_empty() {
            debug!("[ssh] stderr: {}", String::from_utf8_lossy(&self.stderr).trim_end());
        }

        match self.exit_status {
            Some(0) => Ok(String::from_utf8_lossy(&self.stdout).into_owned()),
            Some(status) => Err(SshError::CommandFailed {
                command: command.to_string(),
                status,
            }),
            None => Err(SshError::MissingExitStatus {
                command: command.to_string(),
            }),
        }
    }
}

/// Read and decode an unencrypted OpenSSH private key.
async fn load_private_key(path: &Path) -> Result<PrivateKey, SshError> {
    let pem = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SshError::AuthKey {
            path: path.to_path_buf(),
            source,
        })?;

    decode_secret_key(&pem, None).map_err(|e| SshError::KeyParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::fake::{FIXTURE_KEY, FIXTURE_PUBLIC_KEY};
    use russh::keys::ssh_key::PublicKey;
    use russh::CryptoVec;
    use tempfile::TempDir;

    fn remote_in(dir: &TempDir, port: u16) -> RemoteHost {
        RemoteHost {
            user: "root".into(),
            address: "127.0.0.1".into(),
            port,
            private_key_path: dir.path().join("id_ed25519"),
            known_hosts_path: dir.path().join("known_hosts"),
        }
    }

    fn collect(msgs: Vec<ChannelMsg>) -> ExecOutput {
        let mut output = ExecOutput::default();
        for msg in msgs {
            output.feed(msg);
        }
        output
    }

    fn data(bytes: &[u8]) -> ChannelMsg {
        ChannelMsg::Data {
            data: CryptoVec::from_slice(bytes),
        }
    }

    #[test]
    fn test_exec_output_joins_chunks() {
        let output = collect(vec![
            data(b"f00d\nbe"),
            data(b"ef\n"),
            ChannelMsg::ExitStatus { exit_status: 0 },
            ChannelMsg::Eof,
            ChannelMsg::Close,
        ]);
        assert_eq!(output.into_result("docker ps -q -a").unwrap(), "f00d\nbeef\n");
    }

    #[test]
    fn test_exec_output_excludes_stderr() {
        let output = collect(vec![
            ChannelMsg::ExtendedData {
                data: CryptoVec::from_slice(b"WARNING: something\n"),
                ext: 1,
            },
            data(b"[]\n"),
            ChannelMsg::ExitStatus { exit_status: 0 },
        ]);
        assert_eq!(output.into_result("docker inspect -f json web").unwrap(), "[]\n");
    }

    #[test]
    fn test_exec_output_non_zero_exit() {
        let output = collect(vec![data(b"partial"), ChannelMsg::ExitStatus { exit_status: 3 }]);
        match output.into_result("exit 3") {
            Err(SshError::CommandFailed { command, status }) => {
                assert_eq!(command, "exit 3");
                assert_eq!(status, 3);
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_exec_output_missing_exit_status() {
        let output = collect(vec![data(b"ok\n"), ChannelMsg::Eof, ChannelMsg::Close]);
        let err = output.into_result("true").unwrap_err();
        assert!(matches!(err, SshError::MissingExitStatus { ref command } if command == "true"));
    }

    #[test]
    fn test_exec_output_empty_success() {
        let output = collect(vec![ChannelMsg::ExitStatus { exit_status: 0 }]);
        assert_eq!(output.into_result("true").unwrap(), "");
    }

    async fn connect_err(remote: &RemoteHost) -> SshError {
        match Session::connect(remote).await {
            Ok(_) => panic!("connect unexpectedly succeeded"),
            Err(e) => e,
        }
    }

    #[tokio::test]
    async fn test_load_fixture_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("id_ed25519");
        std::fs::write(&path, FIXTURE_KEY).unwrap();

        let key = load_private_key(&path).await.unwrap();
        assert_eq!(key.algorithm(), Algorithm::Ed25519);
        let public = PublicKey::from_openssh(FIXTURE_PUBLIC_KEY).unwrap();
        assert_eq!(key.public_key().key_data(), public.key_data());
    }

    #[tokio::test]
    async fn test_missing_private_key() {
        let dir = TempDir::new().unwrap();
        let err = connect_err(&remote_in(&dir, 22)).await;
        assert!(matches!(err, SshError::AuthKey { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_garbage_private_key() {
        let dir = TempDir::new().unwrap();
        let remote = remote_in(&dir, 22);
        std::fs::write(&remote.private_key_path, "not a key").unwrap();

        let err = connect_err(&remote).await;
        assert!(matches!(err, SshError::KeyParse { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_missing_known_hosts() {
        let dir = TempDir::new().unwrap();
        let remote = remote_in(&dir, 22);
        std::fs::write(&remote.private_key_path, FIXTURE_KEY).unwrap();

        let err = connect_err(&remote).await;
        match err {
            SshError::KnownHosts { path, .. } => assert_eq!(path, remote.known_hosts_path),
            other => panic!("expected KnownHosts, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let dir = TempDir::new().unwrap();
        // Bind then drop to get a local port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let remote = remote_in(&dir, port);
        std::fs::write(&remote.private_key_path, FIXTURE_KEY).unwrap();
        std::fs::write(&remote.known_hosts_path, "").unwrap();

        let err = connect_err(&remote).await;
        assert!(matches!(err, SshError::Connection { .. }), "got {:?}", err);
        assert!(err.to_string().contains("Did you set USERNAME?"));
    }
}
