//! Orchestration
//!
//! One invocation: connect, perform one [`Action`], disconnect.

use std::io::Write;

use tracing::info;

use crate::config::{Action, AppConfig};
use crate::docker::{inspect, list_container_ids, list_container_names};
use crate::error::Error;
use crate::pipeline::{compose_manifest, derive_run_command, ConversionTools, ExternalTools};
use crate::ssh::{RemoteExec, Session};

/// Connect to the configured host, run the action and write the result to `out`.
pub async fn run<W: Write>(config: &AppConfig, out: &mut W) -> Result<(), Error> {
    let session = Session::connect(&config.remote).await?;
    let tools = ExternalTools::new(config.tools.clone());

    let result = execute(&config.action, &session, &tools, out).await;
    session.close().await;
    result
}

/// Perform `action` with an existing transport and tool set.
pub async fn execute<W: Write>(
    action: &Action,
    remote: &dyn RemoteExec,
    tools: &dyn ConversionTools,
    out: &mut W,
) -> Result<(), Error> {
    match action {
        Action::ListNames => {
            for name in list_container_names(remote).await? {
                writeln!(out, "{}", name)?;
            }
        }
        Action::ListIds => {
            for id in list_container_ids(remote).await? {
                writeln!(out, "{}", id)?;
            }
        }
        Action::Composerize(target) => {
            let manifest = composerize_by_id_or_name(remote, tools, target.as_str()).await?;
            out.write_all(manifest.as_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}

/// inspect → runlike → composerize, returning the finished manifest.
pub async fn composerize_by_id_or_name(
    remote: &dyn RemoteExec,
    tools: &dyn ConversionTools,
    id_or_name: &str,
) -> Result<String, Error> {
    let record = inspect(remote, id_or_name).await?;
    info!("[app] Generating manifest for {} ({})", record.name, record.id);

    let run_command = derive_run_command(tools, &record).await?;
    let manifest = compose_manifest(tools, &run_command).await?;
    Ok(manifest)
}
