//! JSON launch record writer.
//!
//! A record sits next to the launch log and lets an operator find the
//! detached process later. The launcher only writes it.

use crate::launch::{LaunchPlan, LaunchedProcess};
use crate::utils::config::{RECORD_SCHEMA_VERSION, RECORD_SUFFIX};
use crate::utils::error::OutputError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Schema version for compatibility checking
    pub version: String,

    pub pid: u32,

    pub program: String,

    pub args: Vec<String>,

    /// Program and arguments joined with spaces
    pub command_line: String,

    /// Variables injected into the child's environment
    pub env: BTreeMap<String, String>,

    pub log_path: PathBuf,

    pub started_at: DateTime<Utc>,
}

impl LaunchRecord {
    pub fn new(plan: &LaunchPlan, launched: &LaunchedProcess) -> Self {
        Self {
            version: RECORD_SCHEMA_VERSION.to_string(),
            pid: launched.pid,
            program: plan.program.to_string_lossy().into_owned(),
            args: plan
                .args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            command_line: launched.command_line.clone(),
            env: plan.env.iter().cloned().collect(),
            log_path: launched.log_path.clone(),
            started_at: Utc::now(),
        }
    }
}

/// `<log_path>.launch.json`
pub fn record_path_for(log_path: &Path) -> PathBuf {
    let mut name = log_path.as_os_str().to_os_string();
    name.push(RECORD_SUFFIX);
    PathBuf::from(name)
}

/// Write a launch record to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path is empty or a directory
pub fn write_record(record: &LaunchRecord, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, record).map_err(OutputError::SerializationFailed)?;

    info!("Launch record written to: {}", output_path.display());

    Ok(())
}

/// Read a launch record from a JSON file
pub fn read_record(input_path: impl AsRef<Path>) -> Result<LaunchRecord, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading launch record from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let record: LaunchRecord =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(record)
}

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (LaunchPlan, LaunchedProcess) {
        let plan = LaunchPlan::new("boltzgen")
            .args(["run", "a.yaml"])
            .env("CUDA_VISIBLE_DEVICES", "6");
        let launched = LaunchedProcess {
            pid: 4242,
            log_path: PathBuf::from("logs/run.log"),
            command_line: plan.command_line(),
        };
        (plan, launched)
    }

    #[test]
    fn test_record_fields() {
        let (plan, launched) = sample();
        let record = LaunchRecord::new(&plan, &launched);

        assert_eq!(record.version, "1.0.0");
        assert_eq!(record.pid, 4242);
        assert_eq!(record.command_line, "boltzgen run a.yaml");
        assert_eq!(record.env.get("CUDA_VISIBLE_DEVICES").map(String::as_str), Some("6"));
    }

    #[test]
    fn test_write_and_read_record() {
        let (plan, launched) = sample();
        let record = LaunchRecord::new(&plan, &launched);
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.log.launch.json");

        write_record(&record, &path).unwrap();
        let loaded = read_record(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_record_path_suffix() {
        assert_eq!(
            record_path_for(Path::new("nohup_logs/gpr75_run2.log")),
            PathBuf::from("nohup_logs/gpr75_run2.log.launch.json")
        );
    }

    #[test]
    fn test_write_to_directory_fails() {
        let (plan, launched) = sample();
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_record(&LaunchRecord::new(&plan, &launched), temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }
}
