//! Run orchestrator for coordinating a drift check
//!
//! This module provides:
//! - Workflow coordination: load manifest → detect drift → trigger rebuild
//! - Project filters (--only / --exclude)
//! - Dry-run mode support
//! - Fail-fast error handling: the first error ends the run, carrying the
//!   outcomes of the projects already finished

use crate::cli::CliArgs;
use crate::detector::DriftDetector;
use crate::domain::{Project, ProjectOutcome, RunSummary};
use crate::error::{AppError, RunFailure, TriggerError};
use crate::github::{
    BranchTipSource, DispatchAck, GitHubBranches, GitHubWorkflows, HttpClient,
    WorkflowDispatcher,
};
use crate::manifest::load_manifest;
use crate::progress::Progress;
use crate::registry::{DockerCli, ImageInspector};
use crate::resolver::Resolver;
use log::{debug, info, warn};
use std::sync::Arc;

/// Orchestrator for a single run
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Drift detector over the configured transports
    detector: DriftDetector,
    /// Rebuild trigger transport
    dispatcher: Arc<dyn WorkflowDispatcher>,
}

impl Orchestrator {
    /// Create a new orchestrator with real docker and GitHub transports
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let client = HttpClient::with_config(&args.github_api_url, args.timeout)?
            .with_token(args.github_token.clone());
        if !client.is_authenticated() {
            warn!("no GitHub token configured; API calls are unauthenticated");
        }

        let images = DockerCli::with_binary(args.docker_bin.clone())
            .with_pull_policy(args.pull_policy);

        Ok(Self::with_transports(
            args,
            Arc::new(images),
            Arc::new(GitHubBranches::new(client.clone())),
            Arc::new(GitHubWorkflows::new(client)),
        ))
    }

    /// Create an orchestrator with custom transports (for testing)
    pub fn with_transports(
        args: CliArgs,
        images: Arc<dyn ImageInspector>,
        branches: Arc<dyn BranchTipSource>,
        dispatcher: Arc<dyn WorkflowDispatcher>,
    ) -> Self {
        Self {
            args,
            detector: DriftDetector::new(Resolver::new(images, branches)),
            dispatcher,
        }
    }

    /// Load the manifest and check every selected project
    pub async fn run(&self) -> Result<RunSummary, RunFailure> {
        let projects = load_manifest(&self.args.manifest)
            .map_err(|e| RunFailure::new(RunSummary::new(self.args.dry_run), e))?;
        self.run_projects(&projects).await
    }

    /// Check the given projects in order, stopping at the first error
    pub async fn run_projects(&self, projects: &[Project]) -> Result<RunSummary, RunFailure> {
        let mut summary = RunSummary::new(self.args.dry_run);
        let selected: Vec<&Project> = projects
            .iter()
            .filter(|p| self.args.should_process_project(&p.name))
            .collect();

        let mut progress = Progress::new(self.args.show_progress());
        progress.start(selected.len() as u64, "Checking projects");

        for project in selected {
            progress.set_message(&format!("Checking {}", project.name));
            let outcome = self.check_project(project).await;
            progress.inc();

            match outcome {
                Ok(outcome) => summary.add_outcome(outcome),
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(RunFailure::new(summary, e));
                }
            }
        }
        progress.finish_and_clear();

        Ok(summary)
    }

    /// Detect drift for one project and trigger a rebuild if needed
    async fn check_project(&self, project: &Project) -> Result<ProjectOutcome, AppError> {
        let report = self.detector.detect(project).await?;

        if !report.decision.needs_rebuild() {
            info!("{}: No update needed!", project.name);
            return Ok(ProjectOutcome::from_report(report, false));
        }

        let drifted: Vec<&str> = report.drifted().map(|c| c.name.as_str()).collect();
        if self.args.dry_run {
            info!(
                "{}: drift in {}, skipping dispatch of {} (dry-run)",
                project.name,
                drifted.join(", "),
                project.build_workflow
            );
            return Ok(ProjectOutcome::from_report(report, false));
        }

        debug!("{}: drift in {}", project.name, drifted.join(", "));

        let ack = self.trigger(project).await?;
        info!(
            "{}: dispatched {} on {} (HTTP {})",
            project.name, project.build_workflow, project.branch, ack.status
        );
        Ok(ProjectOutcome::from_report(report, true))
    }

    /// Dispatch the project's build workflow on its branch
    async fn trigger(&self, project: &Project) -> Result<DispatchAck, TriggerError> {
        let repo = project
            .coordinate()
            .map_err(|source| TriggerError::InvalidProjectName {
                project: project.name.clone(),
                source,
            })?;

        self.dispatcher
            .dispatch(&repo, &project.build_workflow, &project.branch)
            .await
            .map_err(|source| TriggerError::Dispatch {
                project: project.name.clone(),
                workflow: project.build_workflow.clone(),
                source,
            })
    }
}
