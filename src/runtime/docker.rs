//! Docker CLI runtime.
//!
//! # Responsibilities
//! - Implement the container lifecycle contract by shelling out to the
//!   docker binary
//! - Classify "No such container" failures as not-found
//!
//! # Design Decisions
//! - The CLI is used instead of the daemon API: the scaler issues a
//!   handful of commands per tick at most, and the CLI keeps the
//!   dependency surface to a child process

use tokio::process::Command;

use crate::error::{Result, ScalerError};
use crate::runtime::{ContainerId, ContainerRuntime, ContainerSpec};

/// Container runtime backed by the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    async fn invoke(&self, args: &[String]) -> Result<String> {
        tracing::debug!(?args, "docker invocation");

        let output = Command::new(&self.binary).args(args).output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            return Ok(stdout);
        }

        if is_not_found(&stderr) {
            // The name is always the last argument in the commands we issue.
            let name = args.last().cloned().unwrap_or_default();
            return Err(ScalerError::ContainerNotFound(name));
        }

        Err(ScalerError::Runtime(format!(
            "docker {} exited with {}: {}",
            args.first().map(String::as_str).unwrap_or(""),
            output.status,
            stderr
        )))
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

/// The docker CLI reports missing containers on stderr rather than with a
/// dedicated exit code.
fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such container") || lower.contains("no such object")
}

/// Build the argument vector for `docker run`.
fn run_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        spec.name.clone(),
        "--network".to_string(),
        spec.network.clone(),
        "-p".to_string(),
        format!("{0}:{0}", spec.port),
        spec.image.clone(),
    ];
    args.extend(spec.command.iter().cloned());
    args
}

impl ContainerRuntime for DockerCli {
    async fn run(&self, spec: &ContainerSpec) -> Result<ContainerId> {
        let id = self.invoke(&run_args(spec)).await?;
        Ok(ContainerId(id))
    }

    async fn get(&self, name: &str) -> Result<ContainerId> {
        let id = self
            .invoke(&[
                "inspect".to_string(),
                "--format".to_string(),
                "{{.Id}}".to_string(),
                name.to_string(),
            ])
            .await?;
        Ok(ContainerId(id))
    }

    async fn stop(&self, id: &ContainerId) -> Result<()> {
        self.invoke(&["stop".to_string(), id.0.clone()]).await?;
        Ok(())
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        self.invoke(&["rm".to_string(), id.0.clone()]).await?;
        Ok(())
    }

    async fn exec(&self, name: &str, command: &[String]) -> Result<()> {
        let mut args = vec!["exec".to_string(), name.to_string()];
        args.extend(command.iter().cloned());
        self.invoke(&args).await?;
        Ok(())
    }
}
