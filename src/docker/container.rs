//! Container queries against the remote docker CLI.
//!
//! All queries are read-only and go through a [`RemoteExec`], so tests can
//! answer them from memory.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::text::{lines, sort_case_insensitive};
use crate::ssh::{quote_arg, RemoteExec, SshError};

/// Every container, running or stopped, newest first.
pub const LIST_IDS_COMMAND: &str = "docker ps -q -a";

/// Running containers, one JSON object per line.
pub const LIST_RUNNING_JSON_COMMAND: &str = "docker ps --format json";

/// Container query errors.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error(transparent)]
    Ssh(#[from] SshError),

    #[error("Error unmarshalling JSON from {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("docker inspect returned no container for {0:?}")]
    EmptyInspect(String),
}

/// One inspected container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Full container id
    pub id: String,
    /// Name without the leading `/`
    pub name: String,
    /// `docker inspect` output exactly as received (a JSON array)
    pub inspect: String,
}

/// The fields we read from one `docker inspect` element.
#[derive(Debug, Deserialize)]
struct InspectHead {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
}

/// The field we read from one `docker ps --format json` line.
#[derive(Debug, Deserialize)]
struct PsEntry {
    #[serde(rename = "Names")]
    names: String,
}

/// Ids of all containers, in the order docker reports them.
pub async fn list_container_ids(remote: &dyn RemoteExec) -> Result<Vec<String>, DockerError> {
    let output = remote.run(LIST_IDS_COMMAND).await?;
    Ok(lines(&output))
}

/// Names of running containers, sorted case-insensitively.
pub async fn list_container_names(remote: &dyn RemoteExec) -> Result<Vec<String>, DockerError> {
    let output = remote.run(LIST_RUNNING_JSON_COMMAND).await?;

    let mut names = lines(&output)
        .iter()
        .map(|line| {
            serde_json::from_str::<PsEntry>(line)
                .map(|entry| entry.names)
                .map_err(|source| DockerError::Json {
                    context: "ps (to list container names)",
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    sort_case_insensitive(&mut names);
    Ok(names)
}

/// Inspect one container by id or name.
pub async fn inspect(
    remote: &dyn RemoteExec,
    id_or_name: &str,
) -> Result<ContainerRecord, DockerError> {
    let command = format!("docker inspect -f json {}", quote_arg(id_or_name));
    let output = remote.run(&command).await?;
    parse_inspect(id_or_name, output)
}

fn parse_inspect(id_or_name: &str, output: String) -> Result<ContainerRecord, DockerError> {
    let json_err = |source: serde_json::Error| DockerError::Json {
        context: "docker inspect",
        source,
    };

    // Only the first element matters; the rest of the array is passed on untouched.
    let elements: Vec<serde_json::Value> = serde_json::from_str(&output).map_err(json_err)?;
    let first = elements
        .into_iter()
        .next()
        .ok_or_else(|| DockerError::EmptyInspect(id_or_name.to_string()))?;
    let head: InspectHead = serde_json::from_value(first).map_err(json_err)?;

    let name = head
        .name
        .strip_prefix('/')
        .unwrap_or(&head.name)
        .to_string();
    debug!("[docker] Inspected {} ({})", name, head.id);

    Ok(ContainerRecord {
        id: head.id,
        name,
        inspect: output,
    })
}
