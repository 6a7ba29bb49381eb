//! Configuration Types
//!
//! Immutable values built once at startup and passed down by reference.

use std::path::{Path, PathBuf};

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// Default remote login user
pub const DEFAULT_USER: &str = "root";

/// Default runlike executable
pub const DEFAULT_RUNLIKE: &str = "runlike";

/// Default composerize executable
pub const DEFAULT_COMPOSERIZE: &str = "composerize";

/// SSH connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    /// Remote login user
    pub user: String,
    /// Hostname or IP address
    pub address: String,
    /// SSH port
    pub port: u16,
    /// OpenSSH private key used for authentication
    pub private_key_path: PathBuf,
    /// known_hosts file used to verify the server key
    pub known_hosts_path: PathBuf,
}

impl RemoteHost {
    /// Build a target whose key material lives under `<home>/.ssh`.
    pub fn with_home(
        user: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        home: &Path,
    ) -> Self {
        let ssh_dir = home.join(".ssh");
        Self {
            user: user.into(),
            address: address.into(),
            port,
            private_key_path: ssh_dir.join("id_ed25519"),
            known_hosts_path: ssh_dir.join("known_hosts"),
        }
    }

    /// `host:port`, as dialed
    pub fn target(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Get display string (user@host:port)
    pub fn display_string(&self) -> String {
        if self.port == DEFAULT_PORT {
            format!("{}@{}", self.user, self.address)
        } else {
            format!("{}@{}:{}", self.user, self.address, self.port)
        }
    }
}

/// A local program plus its fixed leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Program name for messages
    pub fn name(&self) -> String {
        self.program.display().to_string()
    }
}

/// The two local conversion tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Reads `docker inspect` JSON on stdin, prints a `docker run` line
    pub runlike: ToolCommand,
    /// Takes a `docker run` line as arguments, prints compose YAML
    pub composerize: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            runlike: ToolCommand::new(DEFAULT_RUNLIKE, &["--no-name", "--stdin"]),
            composerize: ToolCommand::new(DEFAULT_COMPOSERIZE, &[]),
        }
    }
}
