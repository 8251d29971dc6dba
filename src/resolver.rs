//! Reference source resolution
//!
//! Turns a `ReferenceSource` into a comparable version identifier:
//! - Registry images: pull, inspect, read the configured label
//! - Hosted branches: full hash of the branch tip commit
//!
//! A missing label is a soft outcome (`Resolution::LabelMissing`), every
//! transport failure is a hard `ResolveError`.

use crate::domain::{image_reference, ReferenceSource, RepoCoordinate, Resolution, SourceKind};
use crate::error::ResolveError;
use crate::github::BranchTipSource;
use crate::registry::ImageInspector;
use log::{debug, warn};
use std::sync::Arc;

/// Resolver with injected transports
#[derive(Clone)]
pub struct Resolver {
    images: Arc<dyn ImageInspector>,
    branches: Arc<dyn BranchTipSource>,
}

impl Resolver {
    /// Create a resolver over the given transports
    pub fn new(images: Arc<dyn ImageInspector>, branches: Arc<dyn BranchTipSource>) -> Self {
        Self { images, branches }
    }

    /// Resolve one source to a version identifier
    pub async fn resolve(&self, source: &ReferenceSource) -> Result<Resolution, ResolveError> {
        let resolution = match &source.kind {
            SourceKind::RegistryImage { image, tag, label } => {
                self.resolve_image(image, tag, label).await?
            }
            SourceKind::HostedBranch { repo, branch } => {
                self.resolve_branch(repo, branch).await?
            }
        };
        debug!("resolved {} -> {:?}", source, resolution);
        Ok(resolution)
    }

    async fn resolve_image(
        &self,
        image: &str,
        tag: &str,
        label: &str,
    ) -> Result<Resolution, ResolveError> {
        let reference = image_reference(image, tag);
        let registry_error = |source| ResolveError::Registry {
            reference: reference.clone(),
            source,
        };

        self.images
            .ensure_pulled(image, tag)
            .await
            .map_err(registry_error)?;
        let mut labels = self
            .images
            .inspect_labels(image, tag)
            .await
            .map_err(registry_error)?;

        match labels.remove(label) {
            Some(value) => Ok(Resolution::Version(value)),
            None => {
                warn!("Label {} not found in image {}.", label, reference);
                Ok(Resolution::LabelMissing {
                    label: label.to_string(),
                    image: reference,
                })
            }
        }
    }

    async fn resolve_branch(&self, repo: &str, branch: &str) -> Result<Resolution, ResolveError> {
        let coordinate = RepoCoordinate::parse(repo)?;
        let sha = self
            .branches
            .branch_tip(&coordinate, branch)
            .await
            .map_err(|source| ResolveError::Branch {
                repo: repo.to_string(),
                branch: branch.to_string(),
                source,
            })?;
        Ok(Resolution::Version(sha))
    }
}
