//! Branch tip lookups
//!
//! API endpoint: GET /repos/{owner}/{repo}/branches/{branch}

use crate::domain::RepoCoordinate;
use crate::error::TransportError;
use crate::github::{BranchTipSource, HttpClient};
use async_trait::async_trait;
use serde::Deserialize;

/// Branch response, only the fields we read
#[derive(Debug, Deserialize)]
struct BranchResponse {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

/// Branch tip source backed by the GitHub REST API
pub struct GitHubBranches {
    client: HttpClient,
}

impl GitHubBranches {
    /// Create a new branch source
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Endpoint segments; a slashed branch (`release/1.x`) keeps its slashes
    fn endpoint<'a>(repo: &'a RepoCoordinate, branch: &'a str) -> Vec<&'a str> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str(), "branches"];
        segments.extend(branch.split('/'));
        segments
    }
}

#[async_trait]
impl BranchTipSource for GitHubBranches {
    async fn branch_tip(
        &self,
        repo: &RepoCoordinate,
        branch: &str,
    ) -> Result<String, TransportError> {
        let url = self.client.url(Self::endpoint(repo, branch));
        let what = format!("branch {}@{}", repo, branch);
        let response: BranchResponse = self.client.get_json(url, &what).await?;
        Ok(response.commit.sha)
    }
}
