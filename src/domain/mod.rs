//! Core domain models for driftcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Reference sources (registry image labels, branch tips)
//! - Projects and repository coordinates
//! - Resolution outcomes and drift decisions

mod decision;
mod project;
mod source;

pub use decision::{
    Comparison, DriftDecision, DriftReport, ProjectOutcome, Resolution, RunSummary,
};
pub use project::{Project, RepoCoordinate};
pub use source::{image_reference, ReferenceSource, Side, SourceKind};
