//! Configuration Module
//!
//! Builds one immutable [`AppConfig`] from parsed flags and the environment.
//! The environment is passed in as a lookup function, never read from process
//! globals, so every rule here is testable in isolation.
//!
//! Environment:
//! - `HOST`: remote address, required unless `--host` is given
//! - `PORT`: SSH port, default 22
//! - `USERNAME`: login user, default `root`
//! - `HOME`: base for `~/.ssh/id_ed25519` and `~/.ssh/known_hosts`
//! - `RUNLIKE_BIN` / `COMPOSERIZE_BIN`: override the local tool executables

pub mod types;

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::Cli;

pub use types::{RemoteHost, ToolCommand, ToolsConfig, DEFAULT_PORT, DEFAULT_USER};

/// Invalid flags or environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cannot list by both names (--list) and IDs (--ids)")]
    ListConflict,

    #[error("Use only one of: --id, --name")]
    TargetConflict,

    #[error("HOST environment variable is required (or pass --host). Set it to the remote hostname or IP address.")]
    MissingHost,

    #[error("Error parsing PORT environment variable {0:?} (allowed values 1-65535)")]
    InvalidPort(String),

    #[error("Cannot determine home directory: HOME is not set")]
    MissingHome,
}

/// How the user named a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    Id(String),
    Name(String),
}

impl ContainerRef {
    /// The identifier handed to `docker inspect`
    pub fn as_str(&self) -> &str {
        match self {
            ContainerRef::Id(s) | ContainerRef::Name(s) => s,
        }
    }
}

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `--list`
    ListNames,
    /// `--ids`
    ListIds,
    /// `--id` / `--name`
    Composerize(ContainerRef),
}

impl Action {
    /// Resolve the requested action, rejecting conflicting flags.
    ///
    /// Returns `Ok(None)` when no action flag was given.
    pub fn from_cli(cli: &Cli) -> Result<Option<Self>, ConfigError> {
        let id = non_empty(cli.id.as_deref());
        let name = non_empty(cli.name.as_deref());

        if cli.list && cli.ids {
            return Err(ConfigError::ListConflict);
        }
        if id.is_some() && name.is_some() {
            return Err(ConfigError::TargetConflict);
        }

        let action = if cli.list {
            Some(Action::ListNames)
        } else if cli.ids {
            Some(Action::ListIds)
        } else if let Some(id) = id {
            Some(Action::Composerize(ContainerRef::Id(id.to_string())))
        } else {
            name.map(|name| Action::Composerize(ContainerRef::Name(name.to_string())))
        };
        Ok(action)
    }
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub action: Action,
    pub remote: RemoteHost,
    pub tools: ToolsConfig,
}

impl AppConfig {
    /// Build the configuration from flags and an environment lookup.
    ///
    /// Flag validation runs first, so a bad combination is reported even when
    /// `HOST` is missing. `Ok(None)` means no action was requested.
    pub fn from_cli<F>(cli: &Cli, env: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(action) = Action::from_cli(cli)? else {
            return Ok(None);
        };
        let remote = remote_from_env(cli.host.as_deref(), &env)?;
        let tools = tools_from_env(&env);
        Ok(Some(Self {
            action,
            remote,
            tools,
        }))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn remote_from_env<F>(host_flag: Option<&str>, env: &F) -> Result<RemoteHost, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let user = env("USERNAME")
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_string());

    let address = match non_empty(host_flag) {
        Some(host) => host.to_string(),
        None => env("HOST")
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?,
    };

    let port = match env("PORT").filter(|p| !p.is_empty()) {
        Some(raw) => parse_port(&raw)?,
        None => DEFAULT_PORT,
    };

    let home = env("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or(ConfigError::MissingHome)?;

    Ok(RemoteHost::with_home(user, address, port, &home))
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))
}

fn tools_from_env<F>(env: &F) -> ToolsConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut tools = ToolsConfig::default();
    if let Some(bin) = env("RUNLIKE_BIN").filter(|b| !b.is_empty()) {
        tools.runlike.program = PathBuf::from(bin);
    }
    if let Some(bin) = env("COMPOSERIZE_BIN").filter(|b| !b.is_empty()) {
        tools.composerize.program = PathBuf::from(bin);
    }
    tools
}
