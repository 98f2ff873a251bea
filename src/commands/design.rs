//! Design command implementation.

use super::models::DesignArgs;
use crate::design::{DesignJob, JobOutcome};
use crate::output::write_viewer;
use crate::utils::config::VIEWER_FILE;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the design command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid target structure or binder parameters
/// * The tool could not be started
/// * The tool exited non-zero (the job log is still written)
pub fn execute_design(args: DesignArgs) -> Result<JobOutcome> {
    let start_time = Instant::now();

    info!("Step 1/3: Preparing job workspace...");
    let job = DesignJob::prepare(&args.workspace, &args.request)
        .context("Failed to prepare design job")?;

    info!("Step 2/3: Running boltzgen (job {})...", job.id);
    let outcome = job.run(&args.request).context("Failed to run design job")?;

    info!("Step 3/3: Collecting results...");
    print_outcome(&outcome);

    // Whatever the tool left behind is still worth looking at, even after a
    // failed exit.
    if args.viewer {
        if let Some(best) = &outcome.best_structure {
            let page = outcome.job_dir.join(VIEWER_FILE);
            write_viewer(best, &page).context("Failed to write viewer page")?;
            println!("Viewer:    {}", page.display());
        }
    }

    if !outcome.success {
        anyhow::bail!(
            "boltzgen exited with {} (see {})",
            outcome
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "a signal".to_string()),
            outcome.log_path.display()
        );
    }

    info!("Design job completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(outcome)
}

fn print_outcome(outcome: &JobOutcome) {
    println!("Job:       {}", outcome.job_id);
    println!("Directory: {}", outcome.job_dir.display());
    println!("Command:   {}", outcome.command_line);
    println!("Log:       {}", outcome.log_path.display());
    match &outcome.best_structure {
        Some(path) => println!("Best:      {}", path.display()),
        None => println!("No result files found."),
    }
}
