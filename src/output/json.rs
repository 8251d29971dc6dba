//! JSON output formatter for machine processing
//!
//! Emits one record per project: `{project, decision, triggered}`, plus the
//! compared names in verbose mode.

use crate::domain::{Comparison, DriftDecision, ProjectOutcome, RunSummary};
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full run
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// When the run started
    checked_at: DateTime<Utc>,
    /// Per-project results
    projects: Vec<JsonProject<'a>>,
}

/// JSON representation of one project
#[derive(Serialize)]
struct JsonProject<'a> {
    project: &'a str,
    decision: DriftDecision,
    triggered: bool,
    /// Compared names (only in verbose mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    comparisons: Option<&'a [Comparison]>,
}

impl JsonFormatter {
    fn project_to_json<'a>(&self, outcome: &'a ProjectOutcome) -> JsonProject<'a> {
        JsonProject {
            project: &outcome.project,
            decision: outcome.decision,
            triggered: outcome.triggered,
            comparisons: (self.verbosity == Verbosity::Verbose)
                .then_some(outcome.comparisons.as_slice()),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: summary.dry_run,
            checked_at: summary.checked_at,
            projects: summary
                .outcomes
                .iter()
                .map(|o| self.project_to_json(o))
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
