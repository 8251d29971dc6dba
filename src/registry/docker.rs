//! docker CLI adapter
//!
//! Pulls and inspects images by running the local `docker` binary:
//! - `docker image inspect --format {{.Id}} image:tag` (presence check)
//! - `docker pull --quiet image:tag`
//! - `docker image inspect --format {{json .Config.Labels}} image:tag`

use crate::domain::image_reference;
use crate::error::TransportError;
use crate::registry::ImageInspector;
use async_trait::async_trait;
use clap::ValueEnum;
use log::debug;
use std::collections::HashMap;
use std::process::Output;
use tokio::process::Command;

/// When to pull an image before inspecting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PullPolicy {
    /// Pull on every run so moving tags are refreshed
    #[default]
    Always,
    /// Pull only when the image is not present locally
    IfMissing,
}

/// Image inspector that shells out to docker
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    policy: PullPolicy,
}

impl DockerCli {
    /// Create a docker adapter using a specific binary
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            policy: PullPolicy::default(),
        }
    }

    /// Set the pull policy
    pub fn with_pull_policy(mut self, policy: PullPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn presence_args(reference: &str) -> Vec<String> {
        vec![
            "image".to_string(),
            "inspect".to_string(),
            "--format".to_string(),
            "{{.Id}}".to_string(),
            reference.to_string(),
        ]
    }

    fn pull_args(reference: &str) -> Vec<String> {
        vec![
            "pull".to_string(),
            "--quiet".to_string(),
            reference.to_string(),
        ]
    }

    fn labels_args(reference: &str) -> Vec<String> {
        vec![
            "image".to_string(),
            "inspect".to_string(),
            "--format".to_string(),
            "{{json .Config.Labels}}".to_string(),
            reference.to_string(),
        ]
    }

    /// Run docker with the given arguments, capturing output
    async fn run(&self, args: &[String]) -> Result<Output, TransportError> {
        debug!("running {} {}", self.binary, args.join(" "));
        Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| TransportError::command_failed(self.describe(args), e.to_string()))
    }

    /// Run docker and fail on a non-zero exit status
    async fn run_checked(&self, args: &[String]) -> Result<String, TransportError> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(TransportError::command_failed(self.describe(args), message));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn is_present(&self, reference: &str) -> Result<bool, TransportError> {
        let output = self.run(&Self::presence_args(reference)).await?;
        Ok(output.status.success())
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }
}

/// Decode the output of `{{json .Config.Labels}}`; `null` means no labels
fn parse_labels(reference: &str, stdout: &str) -> Result<HashMap<String, String>, TransportError> {
    let labels: Option<HashMap<String, String>> = serde_json::from_str(stdout.trim())
        .map_err(|e| TransportError::invalid_response("docker", reference, e.to_string()))?;
    Ok(labels.unwrap_or_default())
}

#[async_trait]
impl ImageInspector for DockerCli {
    async fn ensure_pulled(&self, image: &str, tag: &str) -> Result<(), TransportError> {
        let reference = image_reference(image, tag);

        if self.policy == PullPolicy::IfMissing && self.is_present(&reference).await? {
            debug!("{} already present locally", reference);
            return Ok(());
        }

        self.run_checked(&Self::pull_args(&reference)).await?;
        Ok(())
    }

    async fn inspect_labels(
        &self,
        image: &str,
        tag: &str,
    ) -> Result<HashMap<String, String>, TransportError> {
        let reference = image_reference(image, tag);
        let stdout = self.run_checked(&Self::labels_args(&reference)).await?;
        parse_labels(&reference, &stdout)
    }
}
