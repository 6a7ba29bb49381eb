//! Local conversion tools run as subprocesses.
//!
//! `runlike` reads the inspect JSON on stdin. Its stdin is fed from a spawned
//! writer task while the output is drained, so neither side can block on a
//! full pipe. The writer is joined before returning.

use std::process::{Output, Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{ToolCommand, ToolsConfig};

/// Subprocess errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to pipe input to {0}")]
    Stdin(String),

    #[error("Failed waiting for {tool}: {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    Exit {
        tool: String,
        status: std::process::ExitStatus,
    },
}

/// The two conversions, as raw stdout.
#[async_trait]
pub trait ConversionTools: Send + Sync {
    /// Feed `docker inspect` JSON to runlike and return what it printed.
    async fn runlike(&self, inspect_json: &str) -> Result<String, ToolError>;

    /// Run composerize with `args` and return what it printed.
    async fn composerize(&self, args: &[&str]) -> Result<String, ToolError>;
}

/// [`ConversionTools`] backed by the real executables.
#[derive(Debug, Clone)]
pub struct ExternalTools {
    config: ToolsConfig,
}

impl ExternalTools {
    pub fn new(config: ToolsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConversionTools for ExternalTools {
    async fn runlike(&self, inspect_json: &str) -> Result<String, ToolError> {
        let tool = &self.config.runlike;
        let mut child = command_for(tool)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Launch {
                tool: tool.name(),
                source,
            })?;
        debug!("[tools] Started {} (pid {:?})", tool.name(), child.id());

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ToolError::Stdin(tool.name()))?;
        let payload = inspect_json.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
            // stdin dropped here: the child sees EOF
        });

        let output = match child.wait_with_output().await {
            Ok(output) => output,
            Err(source) => {
                writer.abort();
                return Err(ToolError::Wait {
                    tool: tool.name(),
                    source,
                });
            }
        };

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("[tools] Writing to {} failed: {}", tool.name(), e),
            Err(e) => debug!("[tools] Writer task for {} ended abnormally: {}", tool.name(), e),
        }

        finish(tool, output)
    }

    async fn composerize(&self, args: &[&str]) -> Result<String, ToolError> {
        let tool = &self.config.composerize;
        let output = command_for(tool)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ToolError::Launch {
                tool: tool.name(),
                source,
            })?;

        finish(tool, output)
    }
}

fn command_for(tool: &ToolCommand) -> Command {
    let mut command = Command::new(&tool.program);
    command
        .args(&tool.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// Check the exit status and decode stdout. Stderr only reaches the debug log.
fn finish(tool: &ToolCommand, output: Output) -> Result<String, ToolError> {
    if !output.stderr.is_empty() {
        debug!(
            "[tools] {} stderr: {}",
            tool.name(),
            String::from_utf8_lossy(&output.stderr).trim_end()
        );
    }

    if !output.status.success() {
        return Err(ToolError::Exit {
            tool: tool.name(),
            status: output.status,
        });
    }

    info!("[tools] {} finished ({} bytes)", tool.name(), output.stdout.len());
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
