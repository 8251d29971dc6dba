//! Resolution and drift decision result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of resolving a single reference source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A concrete version identifier (label value or commit hash)
    Version(String),
    /// The image was inspected but does not carry the requested label
    LabelMissing {
        /// Label key that was looked up
        label: String,
        /// `image:tag` that was inspected
        image: String,
    },
}

impl Resolution {
    /// Converts to the identifier used for comparison; a missing label is `""`
    pub fn into_identifier(self) -> String {
        match self {
            Resolution::Version(id) => id,
            Resolution::LabelMissing { .. } => String::new(),
        }
    }
}

/// Whether a project needs to be rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftDecision {
    /// At least one paired name differs
    NeedsRebuild,
    /// Every upstream matches its downstream
    NoActionNeeded,
}

impl DriftDecision {
    /// Returns true for `NeedsRebuild`
    pub fn needs_rebuild(&self) -> bool {
        matches!(self, DriftDecision::NeedsRebuild)
    }
}

impl fmt::Display for DriftDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriftDecision::NeedsRebuild => write!(f, "needs rebuild"),
            DriftDecision::NoActionNeeded => write!(f, "no action needed"),
        }
    }
}

/// One upstream name compared against its downstream counterpart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Logical name
    pub name: String,
    /// Resolved upstream identifier
    pub upstream: String,
    /// Resolved downstream identifier, `None` when the name has no downstream
    pub downstream: Option<String>,
}

impl Comparison {
    /// Returns true if the downstream is missing or differs
    pub fn is_drifted(&self) -> bool {
        self.downstream.as_deref() != Some(self.upstream.as_str())
    }
}

/// Drift detection result for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    /// Project name
    pub project: String,
    /// Overall decision
    pub decision: DriftDecision,
    /// Per-name comparisons, sorted by name
    pub comparisons: Vec<Comparison>,
}

impl DriftReport {
    /// Returns the comparisons that drifted
    pub fn drifted(&self) -> impl Iterator<Item = &Comparison> {
        self.comparisons.iter().filter(|c| c.is_drifted())
    }
}

/// Final per-project record of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutcome {
    /// Project name
    pub project: String,
    /// Drift decision
    pub decision: DriftDecision,
    /// Whether a rebuild was dispatched
    pub triggered: bool,
    /// Comparisons behind the decision
    pub comparisons: Vec<Comparison>,
}

impl ProjectOutcome {
    /// Builds an outcome from a drift report
    pub fn from_report(report: DriftReport, triggered: bool) -> Self {
        Self {
            project: report.project,
            decision: report.decision,
            triggered,
            comparisons: report.comparisons,
        }
    }
}

/// Summary of every project evaluated in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Whether triggering was suppressed
    pub dry_run: bool,
    /// When the run started
    pub checked_at: DateTime<Utc>,
    /// Outcomes in manifest order
    pub outcomes: Vec<ProjectOutcome>,
}

impl RunSummary {
    /// Creates an empty summary stamped with the current time
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            checked_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    /// Adds a project outcome
    pub fn add_outcome(&mut self, outcome: ProjectOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of projects that drifted
    pub fn rebuild_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.decision.needs_rebuild())
            .count()
    }

    /// Number of rebuilds actually dispatched
    pub fn triggered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.triggered).count()
    }
}
