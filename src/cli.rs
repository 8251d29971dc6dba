//! CLI argument parsing module for driftcheck

use crate::error::ConfigError;
use crate::github::DEFAULT_API_URL;
use crate::manifest::DEFAULT_MANIFEST;
use crate::registry::PullPolicy;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout given in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid timeout in seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Upstream drift checker and rebuild trigger
#[derive(Parser, Debug, Clone)]
#[command(
    name = "driftcheck",
    version,
    about = "Detect upstream drift and trigger downstream rebuilds"
)]
pub struct CliArgs {
    /// Streams manifest to read
    #[arg(default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    // General options
    /// Dry run mode - detect drift without dispatching rebuilds
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output (show every compared name)
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    // Project filters
    /// Skip specific projects (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Check only specific projects (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Transport options
    /// GitHub token used for branch lookups and workflow dispatch
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "30", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// docker binary used to pull and inspect images
    #[arg(long, default_value = "docker")]
    pub docker_bin: String,

    /// When to pull images before reading their labels
    #[arg(long, value_enum, default_value_t = PullPolicy::Always)]
    pub pull_policy: PullPolicy,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Reject option combinations that make no sense together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        self.log_level()?;
        Ok(())
    }

    /// Parsed log level
    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })
    }

    /// Check if a project should be processed based on filters
    pub fn should_process_project(&self, name: &str) -> bool {
        // If --only is specified, only process those projects
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }

    /// Whether the progress spinner should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
