//! Container registry access for image label lookups
//!
//! This module provides:
//! - The `ImageInspector` transport trait used by the resolver
//! - A docker CLI backed implementation

mod docker;

pub use docker::{DockerCli, PullPolicy};

use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for registry image transports
#[async_trait]
pub trait ImageInspector: Send + Sync {
    /// Make sure `image:tag` is available locally, fetching it if needed
    async fn ensure_pulled(&self, image: &str, tag: &str) -> Result<(), TransportError>;

    /// Read the label set of a local `image:tag`
    async fn inspect_labels(
        &self,
        image: &str,
        tag: &str,
    ) -> Result<HashMap<String, String>, TransportError>;
}
