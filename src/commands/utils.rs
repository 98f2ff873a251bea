use anyhow::Result;
use std::path::PathBuf;
use crate::output::{read_record, write_viewer};
use crate::utils::config::RECORD_SCHEMA_VERSION;

/// Print a launch record
pub fn inspect_record(file_path: PathBuf) -> Result<()> {
    println!("Launch record: {}", file_path.display());

    let record = read_record(&file_path)?;

    println!("  Version: {}", record.version);
    println!("  PID: {}", record.pid);
    println!("  Started: {}", record.started_at.to_rfc3339());
    println!("  Command: {}", record.command_line);
    for (key, value) in &record.env {
        println!("  Env: {}={}", key, value);
    }
    println!("  Log: {}", record.log_path.display());

    Ok(())
}

/// Write a viewer page for one structure
pub fn render_structure(structure: PathBuf, output: PathBuf) -> Result<()> {
    write_viewer(&structure, &output)?;
    println!("✓ Viewer written to {}", output.display());
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("boltzgen-launch v{}", env!("CARGO_PKG_VERSION"));
    println!("Launch record schema: v{}", RECORD_SCHEMA_VERSION);
    println!();
    println!("Detached launcher and design-job runner for boltzgen.");
}
