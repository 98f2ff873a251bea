use crate::design::DesignRequest;
use crate::launch::{preset_log_path, DeviceSelector, LaunchPlan, RunInvocation};
use crate::utils::config::{DEFAULT_WORKSPACE, PRESET_DEVICE};
use std::path::PathBuf;

/// Arguments for the launch command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct LaunchArgs {
    /// What to run
    pub invocation: RunInvocation,

    /// Accelerator to advertise (None leaves the environment alone)
    pub device: Option<DeviceSelector>,

    /// Append-mode log receiving stdout and stderr
    pub log_path: PathBuf,

    /// Write `<log>.launch.json` after starting (off for the preset, which
    /// only ever touches its log)
    pub write_record: bool,

    /// Print the command instead of running it
    pub dry_run: bool,
}

impl Default for LaunchArgs {
    /// The fixed gpr75 run
    fn default() -> Self {
        Self {
            invocation: RunInvocation::preset(),
            device: Some(DeviceSelector::new(PRESET_DEVICE)),
            log_path: preset_log_path(),
            write_record: false,
            dry_run: false,
        }
    }
}

impl LaunchArgs {
    pub fn plan(&self) -> LaunchPlan {
        LaunchPlan::from_invocation(&self.invocation, self.device)
    }
}

/// Arguments for the design command
#[derive(Debug, Clone)]
pub struct DesignArgs {
    pub request: DesignRequest,

    /// Parent of all job directories
    pub workspace: PathBuf,

    /// Write `viewer.html` for the best structure
    pub viewer: bool,
}

impl Default for DesignArgs {
    fn default() -> Self {
        Self {
            request: DesignRequest::default(),
            workspace: PathBuf::from(DEFAULT_WORKSPACE),
            viewer: false,
        }
    }
}
