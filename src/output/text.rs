//! Text output formatter for human-readable display
//!
//! One line per project with its decision; in verbose mode every compared
//! name follows with its upstream and downstream identifiers.

use crate::domain::{Comparison, DriftDecision, ProjectOutcome, RunSummary};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Placeholder shown for a name with no downstream counterpart
const MISSING: &str = "(missing)";

/// Placeholder shown for an empty identifier (e.g. a missing label)
const EMPTY: &str = "(empty)";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Describe what happened to a project
    fn status_text(outcome: &ProjectOutcome, dry_run: bool) -> &'static str {
        match outcome.decision {
            DriftDecision::NoActionNeeded => "no update needed",
            DriftDecision::NeedsRebuild if outcome.triggered => "rebuild triggered",
            DriftDecision::NeedsRebuild if dry_run => "rebuild needed (dry-run)",
            DriftDecision::NeedsRebuild => "rebuild needed",
        }
    }

    fn display_id(id: &str) -> &str {
        if id.is_empty() {
            EMPTY
        } else {
            id
        }
    }

    /// Format a single comparison line
    fn format_comparison(
        &self,
        comparison: &Comparison,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let upstream = Self::display_id(&comparison.upstream);
        let downstream = comparison
            .downstream
            .as_deref()
            .map(Self::display_id)
            .unwrap_or(MISSING);
        let drifted = comparison.is_drifted();

        if self.color {
            let name_display = format!("{:width$}", comparison.name, width = max_name_len);
            let (marker, downstream) = if drifted {
                ("≠".red().bold(), downstream.red())
            } else {
                ("=".green(), downstream.dimmed())
            };
            writeln!(
                writer,
                "    {} {} {} {}",
                name_display,
                upstream.bright_white(),
                marker,
                downstream
            )
        } else {
            writeln!(
                writer,
                "    {:width$} {} {} {}",
                comparison.name,
                upstream,
                if drifted { "!=" } else { "==" },
                downstream,
                width = max_name_len
            )
        }
    }

    /// Format one project line, plus its comparisons in verbose mode
    fn format_outcome(
        &self,
        outcome: &ProjectOutcome,
        dry_run: bool,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let status = Self::status_text(outcome, dry_run);

        if self.color {
            let status = match outcome.decision {
                DriftDecision::NoActionNeeded => status.green(),
                DriftDecision::NeedsRebuild if outcome.triggered => status.cyan().bold(),
                DriftDecision::NeedsRebuild => status.yellow().bold(),
            };
            writeln!(writer, "{}: {}", outcome.project.bold(), status)?;
        } else {
            writeln!(writer, "{}: {}", outcome.project, status)?;
        }

        if self.verbosity == Verbosity::Verbose {
            let max_name_len = outcome
                .comparisons
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(0);
            for comparison in &outcome.comparisons {
                self.format_comparison(comparison, max_name_len, writer)?;
            }
        }

        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for outcome in &summary.outcomes {
                self.format_outcome(outcome, summary.dry_run, writer)?;
            }
            if !summary.outcomes.is_empty() {
                writeln!(writer)?;
            }
        }

        let checked = summary.outcomes.len();
        let drifted = summary.rebuild_count();
        let triggered = summary.triggered_count();
        let projects = if checked == 1 { "project" } else { "projects" };

        if self.color {
            writeln!(
                writer,
                "{} {} checked, {} drifted, {} triggered",
                checked.to_string().bold(),
                projects,
                if drifted > 0 {
                    drifted.to_string().yellow().bold()
                } else {
                    drifted.to_string().green()
                },
                triggered.to_string().cyan()
            )
        } else {
            writeln!(
                writer,
                "{} {} checked, {} drifted, {} triggered",
                checked, projects, drifted, triggered
            )
        }
    }
}
