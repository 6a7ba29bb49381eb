//! `docker run` line and compose manifest generation.

use tracing::debug;

use super::tools::{ConversionTools, ToolError};
use crate::docker::{lines, ContainerRecord};

/// composerize emits this when no project name is given; such lines are dropped.
pub const PROJECT_NAME_PLACEHOLDER: &str = "<your project name>";

/// Derive the `docker run` command that recreates `record`.
///
/// The single trailing newline runlike prints is removed.
pub async fn derive_run_command(
    tools: &dyn ConversionTools,
    record: &ContainerRecord,
) -> Result<String, ToolError> {
    let output = tools.runlike(&record.inspect).await?;
    let run_command = output.strip_suffix('\n').unwrap_or(&output).to_string();
    debug!("[pipeline] {} -> {}", record.name, run_command);
    Ok(run_command)
}

/// Turn a `docker run` command into a commented compose manifest.
///
/// The command is split on single spaces to form composerize's argument list.
/// Quoted values that contain spaces are split too.
pub async fn compose_manifest(
    tools: &dyn ConversionTools,
    run_command: &str,
) -> Result<String, ToolError> {
    let args: Vec<&str> = run_command.split(' ').collect();
    let output = tools.composerize(&args).await?;
    Ok(render_manifest(run_command, &output))
}

/// Header comment with the original command, a blank line, then the
/// composerize output without placeholder lines.
pub fn render_manifest(run_command: &str, composerize_output: &str) -> String {
    let mut manifest = String::with_capacity(run_command.len() + composerize_output.len() + 4);
    manifest.push_str("# ");
    manifest.push_str(run_command);
    manifest.push_str("\n\n");

    for line in lines(composerize_output) {
        if !line.contains(PROJECT_NAME_PLACEHOLDER) {
            manifest.push_str(&line);
            manifest.push('\n');
        }
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Returns canned output and remembers what it was given.
    struct CannedTools {
        runlike_out: String,
        composerize_out: String,
        seen_stdin: Mutex<Option<String>>,
        seen_args: Mutex<Vec<String>>,
    }

    impl CannedTools {
        fn new(runlike_out: &str, composerize_out: &str) -> Self {
            Self {
                runlike_out: runlike_out.to_string(),
                composerize_out: composerize_out.to_string(),
                seen_stdin: Mutex::new(None),
                seen_args: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ConversionTools for CannedTools {
        async fn runlike(&self, inspect_json: &str) -> Result<String, ToolError> {
            *self.seen_stdin.lock() = Some(inspect_json.to_string());
            Ok(self.runlike_out.clone())
        }

        async fn composerize(&self, args: &[&str]) -> Result<String, ToolError> {
            *self.seen_args.lock() = args.iter().map(|a| a.to_string()).collect();
            Ok(self.composerize_out.clone())
        }
    }

    fn record() -> ContainerRecord {
        ContainerRecord {
            id: "abc123".into(),
            name: "web".into(),
            inspect: r#"[{"Id":"abc123","Name":"/web"}]"#.into(),
        }
    }

    #[test]
    fn test_render_header_and_body() {
        let manifest = render_manifest(
            "docker run --name web nginx",
            "version: \"3\"\nservices:\n  web:\n    image: nginx\n",
        );
        assert_eq!(
            manifest,
            "# docker run --name web nginx\n\nversion: \"3\"\nservices:\n  web:\n    image: nginx\n"
        );
    }

    #[test]
    fn test_render_drops_placeholder_lines() {
        let output = "name: <your project name>\nservices:\n  # <your project name> here\n  web:\n";
        let manifest = render_manifest("docker run nginx", output);
        assert_eq!(manifest, "# docker run nginx\n\nservices:\n  web:\n");
    }

    #[test]
    fn test_render_adds_missing_final_newline() {
        let manifest = render_manifest("docker run nginx", "services:\n  web:");
        assert_eq!(manifest, "# docker run nginx\n\nservices:\n  web:\n");
    }

    #[test]
    fn test_render_empty_output() {
        assert_eq!(render_manifest("docker run nginx", ""), "# docker run nginx\n\n");
    }

    #[tokio::test]
    async fn test_derive_run_command_trims_newline() {
        let tools = CannedTools::new("docker run --name web nginx\n", "");
        let run_command = derive_run_command(&tools, &record()).await.unwrap();
        assert_eq!(run_command, "docker run --name web nginx");
        assert_eq!(
            tools.seen_stdin.lock().as_deref(),
            Some(r#"[{"Id":"abc123","Name":"/web"}]"#)
        );
    }

    #[tokio::test]
    async fn test_compose_manifest_splits_on_spaces() {
        let tools = CannedTools::new("", "services:\n");
        let manifest = compose_manifest(&tools, "docker run -v '/mnt/my data:/data' nginx")
            .await
            .unwrap();
        assert_eq!(manifest, "# docker run -v '/mnt/my data:/data' nginx\n\nservices:\n");
        // Values with spaces are not re-joined
        assert_eq!(
            *tools.seen_args.lock(),
            vec!["docker", "run", "-v", "'/mnt/my", "data:/data'", "nginx"]
        );
    }
}
