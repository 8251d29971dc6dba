//! Project and repository coordinate types

use super::ReferenceSource;
use crate::error::CoordinateError;
use std::fmt;
use std::str::FromStr;

/// A hosted repository address in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoCoordinate {
    /// Owning user or organisation
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoCoordinate {
    /// Parses `owner/name`; exactly one separator and two non-empty halves
    pub fn parse(value: &str) -> Result<Self, CoordinateError> {
        let mut parts = value.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(CoordinateError::new(value)),
        }
    }
}

impl FromStr for RepoCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A downstream project and the sources it is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// `owner/name` of the project repository
    pub name: String,
    /// Free-form project type from the manifest (informational)
    pub kind: Option<String>,
    /// Ref to dispatch the rebuild on
    pub branch: String,
    /// Workflow file name or id to dispatch
    pub build_workflow: String,
    /// Upstream sources, in manifest order
    pub upstreams: Vec<ReferenceSource>,
    /// Downstream sources, in manifest order
    pub downstreams: Vec<ReferenceSource>,
}

impl Project {
    /// Creates a project without any sources
    pub fn new(
        name: impl Into<String>,
        branch: impl Into<String>,
        build_workflow: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: None,
            branch: branch.into(),
            build_workflow: build_workflow.into(),
            upstreams: Vec::new(),
            downstreams: Vec::new(),
        }
    }

    /// Adds an upstream source
    pub fn with_upstream(mut self, source: ReferenceSource) -> Self {
        self.upstreams.push(source);
        self
    }

    /// Adds a downstream source
    pub fn with_downstream(mut self, source: ReferenceSource) -> Self {
        self.downstreams.push(source);
        self
    }

    /// Repository coordinate derived from the project name
    pub fn coordinate(&self) -> Result<RepoCoordinate, CoordinateError> {
        RepoCoordinate::parse(&self.name)
    }
}
