//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading or decoding the streams manifest
//! - TransportError: Failures talking to docker or the GitHub API
//! - ResolveError: A single reference source could not be resolved
//! - DetectError: Resolution failure tagged with its project and source
//! - TriggerError: The rebuild workflow could not be dispatched
//! - ConfigError: Invalid CLI configuration
//! - RunFailure: The error that ended a run, with the projects finished before it

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{RunSummary, Side};

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Drift detection failed for a project
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Rebuild dispatch failed
    #[error(transparent)]
    Trigger(#[from] TriggerError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport setup errors (e.g. HTTP client construction)
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A run stopped by its first error
///
/// Rebuilds dispatched before the error have already happened, so their
/// outcomes travel with the error to be reported.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct RunFailure {
    /// Outcomes of the projects finished before the error, in manifest order
    pub completed: RunSummary,
    /// The error that ended the run
    pub error: AppError,
}

/// Errors related to the streams manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON decoding error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors raised by the docker and GitHub transports
#[derive(Error, Debug)]
pub enum TransportError {
    /// External command could not be spawned or exited non-zero
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Remote resource does not exist
    #[error("{what} not found on {service}")]
    NotFound { what: String, service: String },

    /// Credentials missing or rejected
    #[error("authentication failed for {service}: {message}")]
    AuthenticationError { service: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {service}")]
    RateLimitExceeded { service: String },

    /// Non-success HTTP status not covered above
    #[error("{service} returned HTTP {status} for {url}")]
    HttpStatus {
        service: String,
        status: u16,
        url: String,
    },

    /// Network request failed
    #[error("request to {url} failed: {message}")]
    NetworkError { url: String, message: String },

    /// Timeout
    #[error("timeout while requesting {url}")]
    Timeout { url: String },

    /// Response could not be decoded
    #[error("invalid response from {service} for {what}: {message}")]
    InvalidResponse {
        service: String,
        what: String,
        message: String,
    },
}

/// A repository coordinate was not in `owner/name` form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed repository coordinate '{value}': expected 'owner/name'")]
pub struct CoordinateError {
    pub value: String,
}

/// Hard failure resolving one reference source
#[derive(Error, Debug)]
pub enum ResolveError {
    /// `repo` field of a hosted branch is not `owner/name`
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    /// Pulling or inspecting an image failed
    #[error("failed to inspect image {reference}: {source}")]
    Registry {
        reference: String,
        #[source]
        source: TransportError,
    },

    /// Looking up a branch tip failed
    #[error("failed to read tip of {repo}@{branch}: {source}")]
    Branch {
        repo: String,
        branch: String,
        #[source]
        source: TransportError,
    },
}

/// Resolution failure with the project and source it came from
#[derive(Error, Debug)]
#[error("project '{project}': {side} '{source_name}' ({kind}): {source}")]
pub struct DetectError {
    pub project: String,
    pub side: Side,
    pub source_name: String,
    pub kind: &'static str,
    #[source]
    pub source: ResolveError,
}

/// Errors dispatching a rebuild
#[derive(Error, Debug)]
pub enum TriggerError {
    /// Project name cannot be used as a repository coordinate
    #[error("project '{project}' cannot be triggered: {source}")]
    InvalidProjectName {
        project: String,
        #[source]
        source: CoordinateError,
    },

    /// The workflow dispatch request failed
    #[error("failed to dispatch workflow '{workflow}' for {project}: {source}")]
    Dispatch {
        project: String,
        workflow: String,
        #[source]
        source: TransportError,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid log level
    #[error("invalid log level '{value}': expected error, warn, info, debug or trace")]
    InvalidLogLevel { value: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl TransportError {
    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        TransportError::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a new NotFound error
    pub fn not_found(what: impl Into<String>, service: impl Into<String>) -> Self {
        TransportError::NotFound {
            what: what.into(),
            service: service.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        service: impl Into<String>,
        what: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TransportError::InvalidResponse {
            service: service.into(),
            what: what.into(),
            message: message.into(),
        }
    }
}

impl RunFailure {
    /// Creates a RunFailure from the partial summary and the error
    pub fn new(completed: RunSummary, error: impl Into<AppError>) -> Self {
        RunFailure {
            completed,
            error: error.into(),
        }
    }
}

impl CoordinateError {
    /// Creates a new CoordinateError for the offending value
    pub fn new(value: impl Into<String>) -> Self {
        CoordinateError {
            value: value.into(),
        }
    }
}
