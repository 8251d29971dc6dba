//! GitHub adapters for branch tips and rebuild dispatch
//!
//! This module provides:
//! - HTTP client shared foundation
//! - Branch tip lookup (`BranchTipSource`)
//! - Workflow dispatch (`WorkflowDispatcher`)

mod branches;
mod client;
mod workflows;

pub use branches::GitHubBranches;
pub use client::{HttpClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use workflows::GitHubWorkflows;

use crate::domain::RepoCoordinate;
use crate::error::TransportError;
use async_trait::async_trait;

/// Trait for hosted repository transports
#[async_trait]
pub trait BranchTipSource: Send + Sync {
    /// Full commit hash at the tip of `branch`
    async fn branch_tip(&self, repo: &RepoCoordinate, branch: &str)
        -> Result<String, TransportError>;
}

/// Acknowledgement of an accepted workflow dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchAck {
    /// HTTP status returned by the API (normally 204)
    pub status: u16,
}

/// Trait for rebuild trigger transports
#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    /// Dispatch `workflow` in `repo` on `git_ref`
    async fn dispatch(
        &self,
        repo: &RepoCoordinate,
        workflow: &str,
        git_ref: &str,
    ) -> Result<DispatchAck, TransportError>;
}
