//! Workflow dispatch
//!
//! API endpoint: POST /repos/{owner}/{repo}/actions/workflows/{workflow}/dispatches

use crate::domain::RepoCoordinate;
use crate::error::TransportError;
use crate::github::{DispatchAck, HttpClient, WorkflowDispatcher};
use async_trait::async_trait;
use serde::Serialize;

/// Dispatch request body
#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

/// Workflow dispatcher backed by the GitHub REST API
pub struct GitHubWorkflows {
    client: HttpClient,
}

impl GitHubWorkflows {
    /// Create a new workflow dispatcher
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    fn endpoint<'a>(repo: &'a RepoCoordinate, workflow: &'a str) -> [&'a str; 7] {
        [
            "repos",
            repo.owner.as_str(),
            repo.name.as_str(),
            "actions",
            "workflows",
            workflow,
            "dispatches",
        ]
    }
}

#[async_trait]
impl WorkflowDispatcher for GitHubWorkflows {
    async fn dispatch(
        &self,
        repo: &RepoCoordinate,
        workflow: &str,
        git_ref: &str,
    ) -> Result<DispatchAck, TransportError> {
        let url = self.client.url(Self::endpoint(repo, workflow));
        let what = format!("workflow {} in {}", workflow, repo);
        let status = self
            .client
            .post_json(url, &DispatchRequest { git_ref }, &what)
            .await?;
        Ok(DispatchAck {
            status: status.as_u16(),
        })
    }
}
