//! Building and starting `boltzgen run` processes.
//!
//! This module handles:
//! - Device selection through the environment
//! - Argument construction for the tool
//! - Detached and captured process execution

pub mod device;
pub mod invocation;
pub mod process;

pub use device::DeviceSelector;
pub use invocation::{BoltzgenTool, ConfigOverride, RunInvocation};
pub use process::{launch_detached, run_captured, CapturedRun, LaunchPlan, LaunchedProcess};

use crate::utils::config::{PRESET_DEVICE, PRESET_LOG};
use std::path::PathBuf;

/// Plan for the fixed gpr75 run
///
/// Built only from constants; nothing from the caller's arguments or
/// environment feeds into it.
pub fn preset_plan() -> LaunchPlan {
    LaunchPlan::from_invocation(
        &RunInvocation::preset(),
        Some(DeviceSelector::new(PRESET_DEVICE)),
    )
}

/// Log file for the fixed gpr75 run
pub fn preset_log_path() -> PathBuf {
    PathBuf::from(PRESET_LOG)
}
