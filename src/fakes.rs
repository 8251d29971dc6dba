//! In-memory transports for unit tests

use crate::domain::{image_reference, RepoCoordinate};
use crate::error::TransportError;
use crate::github::{BranchTipSource, DispatchAck, WorkflowDispatcher};
use crate::registry::ImageInspector;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Images keyed by `image:tag`
#[derive(Default)]
pub struct FakeImages {
    labels: HashMap<String, HashMap<String, String>>,
    unreachable: HashSet<String>,
    pub pulls: Mutex<Vec<String>>,
}

impl FakeImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, image: &str, tag: &str, key: &str, value: &str) -> Self {
        self.labels
            .entry(image_reference(image, tag))
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_image(mut self, image: &str, tag: &str) -> Self {
        self.labels.entry(image_reference(image, tag)).or_default();
        self
    }

    pub fn unreachable(mut self, image: &str, tag: &str) -> Self {
        self.unreachable.insert(image_reference(image, tag));
        self
    }
}

#[async_trait]
impl ImageInspector for FakeImages {
    async fn ensure_pulled(&self, image: &str, tag: &str) -> Result<(), TransportError> {
        let reference = image_reference(image, tag);
        self.pulls.lock().unwrap().push(reference.clone());
        if self.unreachable.contains(&reference) {
            return Err(TransportError::command_failed(
                format!("docker pull {}", reference),
                "pull access denied",
            ));
        }
        if !self.labels.contains_key(&reference) {
            return Err(TransportError::not_found(reference, "docker"));
        }
        Ok(())
    }

    async fn inspect_labels(
        &self,
        image: &str,
        tag: &str,
    ) -> Result<HashMap<String, String>, TransportError> {
        let reference = image_reference(image, tag);
        self.labels
            .get(&reference)
            .cloned()
            .ok_or_else(|| TransportError::not_found(reference, "docker"))
    }
}

/// Branch tips keyed by `owner/name@branch`
#[derive(Default)]
pub struct FakeBranches {
    tips: HashMap<String, String>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeBranches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tip(mut self, repo: &str, branch: &str, sha: &str) -> Self {
        self.tips
            .insert(format!("{}@{}", repo, branch), sha.to_string());
        self
    }
}

#[async_trait]
impl BranchTipSource for FakeBranches {
    async fn branch_tip(
        &self,
        repo: &RepoCoordinate,
        branch: &str,
    ) -> Result<String, TransportError> {
        let key = format!("{}@{}", repo, branch);
        self.lookups.lock().unwrap().push(key.clone());
        self.tips
            .get(&key)
            .cloned()
            .ok_or_else(|| TransportError::not_found(format!("branch {}", key), "GitHub"))
    }
}

/// Records dispatches; optionally fails them all
#[derive(Default)]
pub struct FakeDispatcher {
    fail: bool,
    pub dispatched: Mutex<Vec<(String, String, String)>>,
}

impl FakeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.dispatched.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowDispatcher for FakeDispatcher {
    async fn dispatch(
        &self,
        repo: &RepoCoordinate,
        workflow: &str,
        git_ref: &str,
    ) -> Result<DispatchAck, TransportError> {
        if self.fail {
            return Err(TransportError::AuthenticationError {
                service: "GitHub".to_string(),
                message: "HTTP 401".to_string(),
            });
        }
        self.dispatched.lock().unwrap().push((
            repo.to_string(),
            workflow.to_string(),
            git_ref.to_string(),
        ));
        Ok(DispatchAck { status: 204 })
    }
}
