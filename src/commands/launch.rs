//! Launch command implementation.
//!
//! The launch command:
//! 1. Builds the plan (program, arguments, device variable)
//! 2. Starts it detached with output appended to the log
//! 3. Writes the launch record next to the log
//!
//! It returns as soon as the child exists and never looks at it again.

use super::models::LaunchArgs;
use crate::launch::{launch_detached, LaunchedProcess};
use crate::output::{record_path_for, write_record, LaunchRecord};
use anyhow::{Context, Result};
use log::{info, warn};

/// Execute the launch command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The started process, or `None` for a dry run
///
/// # Errors
/// * Log file cannot be opened (its directory is never created)
/// * The program cannot be started
pub fn execute_launch(args: LaunchArgs) -> Result<Option<LaunchedProcess>> {
    let plan = args.plan();

    if args.dry_run {
        for (key, value) in &plan.env {
            println!("{}={}", key, value);
        }
        println!("{}", plan.command_line());
        println!(">> {}", args.log_path.display());
        return Ok(None);
    }

    let launched = launch_detached(&plan, &args.log_path).context("Failed to launch boltzgen")?;

    // The child is already running; a record failure must not turn into a
    // launch failure.
    if args.write_record {
        let record_path = record_path_for(&launched.log_path);
        if let Err(e) = write_record(&LaunchRecord::new(&plan, &launched), &record_path) {
            warn!("Could not write launch record {}: {}", record_path.display(), e);
        }
    }

    info!("✓ Launched pid {}", launched.pid);
    println!("{}", launched.pid);

    Ok(Some(launched))
}

/// Launch the fixed gpr75 run
///
/// **Public** - what `boltzgen-launch` does with no subcommand
pub fn execute_preset() -> Result<Option<LaunchedProcess>> {
    execute_launch(LaunchArgs::default())
}

/// Validate launch arguments
///
/// Only the launcher's own inputs are checked. The tool's options are passed
/// through untouched.
pub fn validate_args(args: &LaunchArgs) -> Result<()> {
    if args.invocation.program().is_empty() {
        anyhow::bail!("Tool program cannot be empty");
    }

    if args.log_path.as_os_str().is_empty() {
        anyhow::bail!("Log path cannot be empty");
    }

    if args.log_path.is_dir() {
        anyhow::bail!("Log path is a directory: {}", args.log_path.display());
    }

    Ok(())
}
