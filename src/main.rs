//! driftcheck - upstream drift checker CLI tool
//!
//! Reads a streams manifest, compares each project's upstream versions with
//! its downstream ones and dispatches a rebuild workflow when they differ.

use clap::Parser;
use driftcheck::cli::CliArgs;
use driftcheck::domain::RunSummary;
use driftcheck::orchestrator::Orchestrator;
use driftcheck::output::{create_formatter, OutputConfig, OutputFormatter};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;

    env_logger::Builder::new()
        .filter_level(args.log_level()?)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if args.verbose {
        eprintln!("driftcheck v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Manifest: {}", args.manifest.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let orchestrator = Orchestrator::new(args.clone())?;

    let mut output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    output_config.color = io::stdout().is_terminal();
    let formatter = create_formatter(output_config);

    match orchestrator.run().await {
        Ok(summary) => {
            write_report(formatter.as_ref(), &summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            // Report rebuilds that were dispatched before the run stopped
            if !failure.completed.outcomes.is_empty() {
                write_report(formatter.as_ref(), &failure.completed)?;
            }
            Err(failure.error.into())
        }
    }
}

/// Write the run summary to stdout
fn write_report(formatter: &dyn OutputFormatter, summary: &RunSummary) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    formatter.format(summary, &mut stdout)?;
    stdout.flush()
}
