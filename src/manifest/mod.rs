//! Streams manifest loading
//!
//! This module provides functionality to:
//! - Read the streams manifest from disk
//! - Decode projects and their upstream/downstream reference sources

mod streams;

pub use streams::parse_streams;

use crate::domain::Project;
use crate::error::ManifestError;
use std::path::Path;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "streams.json";

/// Load every project from a manifest file
pub fn load_manifest(path: &Path) -> Result<Vec<Project>, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

    parse_streams(&content, path)
}
