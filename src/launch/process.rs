//! Process spawning.
//!
//! Two ways to run a plan:
//! - `launch_detached`: fire-and-forget start in a new session, stdout and
//!   stderr appended to a log file, returns as soon as the child exists
//! - `run_captured`: blocking run with stdout/stderr collected in memory

use super::device::DeviceSelector;
use super::invocation::RunInvocation;
use crate::utils::error::LaunchError;
use log::{debug, info};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Fully resolved description of a child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Variables added to the inherited environment
    pub env: Vec<(String, String)>,
    pub current_dir: Option<PathBuf>,
}

impl LaunchPlan {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    pub fn from_invocation(invocation: &RunInvocation, device: Option<DeviceSelector>) -> Self {
        let mut plan = Self::new(invocation.program().clone()).args(invocation.args());
        if let Some(device) = device {
            let (key, value) = device.env_pair();
            plan = plan.env(key, value);
        }
        plan
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Space-joined program and arguments, as a shell user would type them
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// A child started by `launch_detached`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub pid: u32,
    pub log_path: PathBuf,
    pub command_line: String,
}

/// Result of a blocking `run_captured`
#[derive(Debug, Clone)]
pub struct CapturedRun {
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Start the plan detached from the current session
///
/// The log file is opened in create+append mode and receives both stdout and
/// stderr. Its parent directory must already exist. stdin is `/dev/null`.
/// On unix the child runs `setsid()` and ignores SIGHUP before exec, so
/// closing the launching terminal does not reach it.
///
/// The child handle is dropped without waiting; nothing here observes the
/// child after it starts.
///
/// # Errors
/// * `LaunchError::LogOpen` - log file cannot be opened
/// * `LaunchError::Spawn` - the program could not be started
pub fn launch_detached(
    plan: &LaunchPlan,
    log_path: impl AsRef<Path>,
) -> Result<LaunchedProcess, LaunchError> {
    let log_path = log_path.as_ref();

    let stdout_log = open_log(log_path)?;
    let stderr_log = stdout_log.try_clone().map_err(|source| LaunchError::LogOpen {
        path: log_path.to_path_buf(),
        source,
    })?;

    let mut cmd = plan.command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(stdout_log))
        .stderr(Stdio::from(stderr_log));
    detach(&mut cmd);

    let command_line = plan.command_line();
    info!("Launching: {}", command_line);
    for (key, value) in &plan.env {
        debug!("  env {}={}", key, value);
    }

    let child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        program: plan.program_name(),
        source,
    })?;

    let pid = child.id();
    info!("Started pid {} (output appended to {})", pid, log_path.display());

    // Dropping `Child` neither kills nor waits on the process.
    drop(child);

    Ok(LaunchedProcess {
        pid,
        log_path: log_path.to_path_buf(),
        command_line,
    })
}

/// Run the plan to completion, collecting its output
///
/// # Errors
/// * `LaunchError::Spawn` - the program could not be started
pub fn run_captured(plan: &LaunchPlan) -> Result<CapturedRun, LaunchError> {
    info!("Executing: {}", plan.command_line());

    let output = plan
        .command()
        .stdin(Stdio::null())
        .output()
        .map_err(|source| LaunchError::Spawn {
            program: plan.program_name(),
            source,
        })?;

    debug!(
        "Process exited with {:?} ({} bytes stdout, {} bytes stderr)",
        output.status.code(),
        output.stdout.len(),
        output.stderr.len()
    );

    Ok(CapturedRun {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn open_log(path: &Path) -> Result<File, LaunchError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LaunchError::LogOpen {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;

    // Only async-signal-safe calls between fork and exec.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            if libc::signal(libc::SIGHUP, libc::SIG_IGN) == libc::SIG_ERR {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;

    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_cmd: &mut Command) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let plan = LaunchPlan::new("boltzgen")
            .arg("run")
            .arg("a.yaml")
            .args(["--budget", "3"]);
        assert_eq!(plan.command_line(), "boltzgen run a.yaml --budget 3");
    }

    #[test]
    fn test_from_invocation_sets_device() {
        let plan = LaunchPlan::from_invocation(
            &RunInvocation::preset(),
            Some(DeviceSelector::new(2)),
        );
        assert_eq!(
            plan.env,
            vec![("CUDA_VISIBLE_DEVICES".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_from_invocation_without_device() {
        let plan = LaunchPlan::from_invocation(&RunInvocation::preset(), None);
        assert!(plan.env.is_empty());
    }

    #[test]
    fn test_missing_log_dir_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("missing/run.log");

        let err = launch_detached(&LaunchPlan::new("true"), &log).unwrap_err();
        assert!(matches!(err, LaunchError::LogOpen { .. }));
        assert!(!log.parent().unwrap().exists());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = temp_dir.path().join("run.log");

        let plan = LaunchPlan::new("definitely-not-a-real-binary-9f1c");
        let err = launch_detached(&plan, &log).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }
}
