//! driftcheck - upstream drift detection library
//!
//! This library resolves upstream and downstream reference sources to
//! version identifiers and decides whether a project needs a rebuild:
//! - Container image labels (via docker)
//! - Branch tip commits (via the GitHub API)
//! - Rebuilds dispatched as GitHub Actions workflows

pub mod cli;
pub mod detector;
pub mod domain;
pub mod error;
pub mod github;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod fakes;
