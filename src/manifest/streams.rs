//! streams.json decoding
//!
//! Source records are decoded straight into a tagged enum keyed by `type`.
//! Records whose `type` is not recognised land in a catch-all variant and
//! are dropped with a warning.

use crate::domain::{Project, ReferenceSource, Side};
use crate::error::ManifestError;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Top-level manifest document
#[derive(Debug, Deserialize)]
struct StreamsFile {
    projects: Vec<ProjectRecord>,
}

/// A project entry as written in the manifest
#[derive(Debug, Deserialize)]
struct ProjectRecord {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    branch: String,
    build_workflow_filename: String,
    #[serde(default)]
    upstreams: Vec<SourceRecord>,
    #[serde(default)]
    downstreams: Vec<SourceRecord>,
}

/// A reference source entry, discriminated by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SourceRecord {
    Docker {
        name: String,
        image: String,
        tag: String,
        label: String,
    },
    Github {
        name: String,
        repo: String,
        branch: String,
    },
    #[serde(other)]
    Unrecognized,
}

impl SourceRecord {
    fn into_source(self) -> Option<ReferenceSource> {
        match self {
            SourceRecord::Docker {
                name,
                image,
                tag,
                label,
            } => Some(ReferenceSource::registry_image(name, image, tag, label)),
            SourceRecord::Github { name, repo, branch } => {
                Some(ReferenceSource::hosted_branch(name, repo, branch))
            }
            SourceRecord::Unrecognized => None,
        }
    }
}

/// Parse manifest content; `path` is only used for error messages
pub fn parse_streams(content: &str, path: &Path) -> Result<Vec<Project>, ManifestError> {
    let file: StreamsFile = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    Ok(file.projects.into_iter().map(into_project).collect())
}

fn into_project(record: ProjectRecord) -> Project {
    let upstreams = convert_sources(&record.name, Side::Upstream, record.upstreams);
    let downstreams = convert_sources(&record.name, Side::Downstream, record.downstreams);

    let project = Project::new(record.name, record.branch, record.build_workflow_filename);
    let project = upstreams.into_iter().fold(project, Project::with_upstream);
    let mut project = downstreams.into_iter().fold(project, Project::with_downstream);
    project.kind = record.kind;
    project
}

fn convert_sources(project: &str, side: Side, records: Vec<SourceRecord>) -> Vec<ReferenceSource> {
    let mut seen = HashSet::new();
    let mut sources = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let Some(source) = record.into_source() else {
            warn!(
                "project '{}': ignoring {} #{} with unrecognized type",
                project, side, index
            );
            continue;
        };

        if !seen.insert(source.name.clone()) {
            debug!(
                "project '{}': duplicate {} name '{}', later entry wins",
                project, side, source.name
            );
        }
        sources.push(source);
    }

    sources
}
