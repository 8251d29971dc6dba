//! Reference source types: where a version identifier comes from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a project a reference source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Producer whose version the project should track
    Upstream,
    /// Version currently embedded in the project
    Downstream,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Upstream => write!(f, "upstream"),
            Side::Downstream => write!(f, "downstream"),
        }
    }
}

/// The differently-shaped places a version can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A label on a container image in a registry
    RegistryImage {
        /// Repository coordinate, e.g. `ghcr.io/acme/base`
        image: String,
        /// Image tag
        tag: String,
        /// Label key whose value is the version identifier
        label: String,
    },
    /// The tip commit of a branch on a hosted repository
    HostedBranch {
        /// `owner/name`
        repo: String,
        /// Branch name
        branch: String,
    },
}

/// A named reference source; `name` pairs upstreams with downstreams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSource {
    /// Logical name, the join key between sides
    pub name: String,
    /// Where to read the version from
    pub kind: SourceKind,
}

impl ReferenceSource {
    /// Creates a registry image source
    pub fn registry_image(
        name: impl Into<String>,
        image: impl Into<String>,
        tag: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::RegistryImage {
                image: image.into(),
                tag: tag.into(),
                label: label.into(),
            },
        }
    }

    /// Creates a hosted branch source
    pub fn hosted_branch(
        name: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::HostedBranch {
                repo: repo.into(),
                branch: branch.into(),
            },
        }
    }

    /// Returns the manifest discriminant for this source
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SourceKind::RegistryImage { .. } => "docker",
            SourceKind::HostedBranch { .. } => "github",
        }
    }
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SourceKind::RegistryImage { image, tag, label } => {
                write!(f, "{} (docker {}:{} label {})", self.name, image, tag, label)
            }
            SourceKind::HostedBranch { repo, branch } => {
                write!(f, "{} (github {}@{})", self.name, repo, branch)
            }
        }
    }
}

/// Formats an image reference as `image:tag`
pub fn image_reference(image: &str, tag: &str) -> String {
    format!("{}:{}", image, tag)
}
