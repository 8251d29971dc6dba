//! Integration tests for driftcheck
//!
//! These tests verify:
//! - Manifest decoding feeding straight into drift detection
//! - The end-to-end run over a manifest file with in-memory transports
//! - Fail-fast behaviour across projects

use async_trait::async_trait;
use driftcheck::detector::DriftDetector;
use driftcheck::domain::{DriftDecision, RepoCoordinate};
use driftcheck::error::{AppError, TransportError};
use driftcheck::github::{BranchTipSource, DispatchAck, WorkflowDispatcher};
use driftcheck::manifest::parse_streams;
use driftcheck::orchestrator::Orchestrator;
use driftcheck::registry::ImageInspector;
use driftcheck::resolver::Resolver;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Images keyed by `image:tag`, each with a label map
#[derive(Default)]
struct StaticImages(HashMap<String, HashMap<String, String>>);

impl StaticImages {
    fn with(mut self, reference: &str, label: &str, value: &str) -> Self {
        self.0
            .entry(reference.to_string())
            .or_default()
            .insert(label.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl ImageInspector for StaticImages {
    async fn ensure_pulled(&self, image: &str, tag: &str) -> Result<(), TransportError> {
        let reference = format!("{}:{}", image, tag);
        if self.0.contains_key(&reference) {
            Ok(())
        } else {
            Err(TransportError::not_found(reference, "docker"))
        }
    }

    async fn inspect_labels(
        &self,
        image: &str,
        tag: &str,
    ) -> Result<HashMap<String, String>, TransportError> {
        let reference = format!("{}:{}", image, tag);
        self.0
            .get(&reference)
            .cloned()
            .ok_or_else(|| TransportError::not_found(reference, "docker"))
    }
}

/// Branch tips keyed by `owner/name@branch`
#[derive(Default)]
struct StaticBranches(HashMap<String, String>);

impl StaticBranches {
    fn with(mut self, key: &str, sha: &str) -> Self {
        self.0.insert(key.to_string(), sha.to_string());
        self
    }
}

#[async_trait]
impl BranchTipSource for StaticBranches {
    async fn branch_tip(
        &self,
        repo: &RepoCoordinate,
        branch: &str,
    ) -> Result<String, TransportError> {
        let key = format!("{}@{}", repo, branch);
        self.0
            .get(&key)
            .cloned()
            .ok_or_else(|| TransportError::not_found(key, "GitHub"))
    }
}

/// Records every dispatch as `owner/name:workflow@ref`
#[derive(Default)]
struct RecordingDispatcher(Mutex<Vec<String>>);

#[async_trait]
impl WorkflowDispatcher for RecordingDispatcher {
    async fn dispatch(
        &self,
        repo: &RepoCoordinate,
        workflow: &str,
        git_ref: &str,
    ) -> Result<DispatchAck, TransportError> {
        self.0
            .lock()
            .unwrap()
            .push(format!("{}:{}@{}", repo, workflow, git_ref));
        Ok(DispatchAck { status: 204 })
    }
}

fn parse(content: &str) -> Vec<driftcheck::domain::Project> {
    parse_streams(content, Path::new("streams.json")).expect("manifest should parse")
}

fn manifest(downstream_repo_branch: &str, upstream_extra: &str) -> String {
    format!(
        r#"{{"projects": [{{
            "name": "acme/app",
            "type": "service",
            "branch": "main",
            "build_workflow_filename": "build.yml",
            "upstreams": [
                {{"name": "base", "type": "docker", "image": "x", "tag": "1", "label": "rev"}}
                {upstream_extra}
            ],
            "downstreams": [
                {{"name": "base", "type": "github", "repo": "o/r", "branch": "{downstream_repo_branch}"}}
            ]
        }}]}}"#
    )
}

fn detector() -> DriftDetector {
    DriftDetector::new(Resolver::new(
        Arc::new(StaticImages::default().with("x:1", "rev", "abc")),
        Arc::new(
            StaticBranches::default()
                .with("o/r@same", "abc")
                .with("o/r@moved", "def"),
        ),
    ))
}

mod drift_scenarios {
    use super::*;

    #[tokio::test]
    async fn test_label_matches_commit() {
        let projects = parse(&manifest("same", ""));
        let report = detector().detect(&projects[0]).await.unwrap();
        assert_eq!(report.decision, DriftDecision::NoActionNeeded);
    }

    #[tokio::test]
    async fn test_label_differs_from_commit() {
        let projects = parse(&manifest("moved", ""));
        let report = detector().detect(&projects[0]).await.unwrap();
        assert_eq!(report.decision, DriftDecision::NeedsRebuild);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_excluded_from_comparison() {
        let extra = r#", {"name": "ghost", "type": "unknown", "image": "nowhere"}"#;
        let projects = parse(&manifest("same", extra));
        assert_eq!(projects[0].upstreams.len(), 1);

        let report = detector().detect(&projects[0]).await.unwrap();
        assert_eq!(report.decision, DriftDecision::NoActionNeeded);
        assert!(report.comparisons.iter().all(|c| c.name != "ghost"));
    }

    #[tokio::test]
    async fn test_downstream_only_names_are_ignored() {
        let content = r#"{"projects": [{
            "name": "acme/app",
            "branch": "main",
            "build_workflow_filename": "build.yml",
            "upstreams": [],
            "downstreams": [{"name": "base", "type": "github", "repo": "o/r", "branch": "moved"}]
        }]}"#;
        let projects = parse(content);
        let report = detector().detect(&projects[0]).await.unwrap();
        assert_eq!(report.decision, DriftDecision::NoActionNeeded);
        assert!(report.comparisons.is_empty());
    }
}

mod full_run {
    use super::*;
    use clap::Parser;
    use driftcheck::cli::CliArgs;
    use driftcheck::output::{
        create_formatter, OutputConfig, OutputFormat, OutputFormatter, Verbosity,
    };
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("streams.json");
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn orchestrator(
        path: &str,
        extra: &[&str],
        dispatcher: Arc<RecordingDispatcher>,
    ) -> Orchestrator {
        let mut argv = vec!["driftcheck", "--quiet", path];
        argv.extend(extra);
        Orchestrator::with_transports(
            CliArgs::parse_from(argv),
            Arc::new(StaticImages::default().with("x:1", "rev", "abc")),
            Arc::new(
                StaticBranches::default()
                    .with("o/r@same", "abc")
                    .with("o/r@moved", "def"),
            ),
            dispatcher,
        )
    }

    #[tokio::test]
    async fn test_run_triggers_drifted_project() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, &manifest("moved", ""));
        let dispatcher = Arc::new(RecordingDispatcher::default());

        let summary = orchestrator(&path, &[], dispatcher.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.triggered_count(), 1);
        assert_eq!(
            *dispatcher.0.lock().unwrap(),
            vec!["acme/app:build.yml@main".to_string()]
        );
    }

    #[tokio::test]
    async fn test_run_dry_run_reports_without_dispatch() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, &manifest("moved", ""));
        let dispatcher = Arc::new(RecordingDispatcher::default());

        let summary = orchestrator(&path, &["--dry-run"], dispatcher.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.rebuild_count(), 1);
        assert_eq!(summary.triggered_count(), 0);
        assert!(dispatcher.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_aborts_on_first_failure() {
        let dir = TempDir::new().unwrap();
        let content = r#"{"projects": [
            {
                "name": "acme/broken",
                "branch": "main",
                "build_workflow_filename": "build.yml",
                "upstreams": [{"name": "base", "type": "docker", "image": "missing", "tag": "1", "label": "rev"}]
            },
            {
                "name": "acme/app",
                "branch": "main",
                "build_workflow_filename": "build.yml",
                "upstreams": [{"name": "base", "type": "docker", "image": "x", "tag": "1", "label": "rev"}]
            }
        ]}"#;
        let path = write_manifest(&dir, content);
        let dispatcher = Arc::new(RecordingDispatcher::default());

        let failure = orchestrator(&path, &[], dispatcher.clone())
            .run()
            .await
            .unwrap_err();

        assert!(failure.completed.outcomes.is_empty());
        match failure.error {
            AppError::Detect(detect) => {
                assert_eq!(detect.project, "acme/broken");
                assert_eq!(detect.source_name, "base");
                assert_eq!(detect.kind, "docker");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(dispatcher.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_after_dispatch_reports_the_dispatch() {
        let dir = TempDir::new().unwrap();
        let content = r#"{"projects": [
            {
                "name": "acme/one",
                "branch": "main",
                "build_workflow_filename": "build.yml",
                "upstreams": [{"name": "base", "type": "docker", "image": "x", "tag": "1", "label": "rev"}]
            },
            {
                "name": "acme/two",
                "branch": "main",
                "build_workflow_filename": "build.yml",
                "upstreams": [{"name": "base", "type": "github", "repo": "o/r", "branch": "gone"}]
            }
        ]}"#;
        let path = write_manifest(&dir, content);
        let dispatcher = Arc::new(RecordingDispatcher::default());

        let failure = orchestrator(&path, &[], dispatcher.clone())
            .run()
            .await
            .unwrap_err();

        assert!(failure.to_string().contains("acme/two"));
        assert_eq!(
            *dispatcher.0.lock().unwrap(),
            vec!["acme/one:build.yml@main".to_string()]
        );

        let formatter = create_formatter(OutputConfig {
            format: OutputFormat::Text,
            verbosity: Verbosity::Normal,
            color: false,
        });
        let mut output = Vec::new();
        formatter.format(&failure.completed, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("acme/one: rebuild triggered"));
        assert!(output.contains("1 project checked, 1 drifted, 1 triggered"));
    }
}
