//! Design job workspace and execution.
//!
//! A job:
//! 1. Creates `<workspace>/run_<id>`
//! 2. Copies the target structure into it
//! 3. Writes `design_spec.yaml`
//! 4. Runs `boltzgen run` to completion with the job dir as cwd
//! 5. Writes `job.log` and looks for the best result structure

use super::results::find_best_structure;
use super::spec::{DesignSpec, TargetParams};
use crate::launch::{run_captured, BoltzgenTool, DeviceSelector, LaunchPlan, RunInvocation};
use crate::utils::config::{
    DEFAULT_BINDER_MAX, DEFAULT_BINDER_MIN, DEFAULT_JOB_BUDGET, DEFAULT_JOB_NUM_DESIGNS,
    DEFAULT_SAMPLING_STEPS, DEFAULT_TARGET_CHAIN, DESIGN_SPEC_FILE, JOB_LOG_FILE,
    PRESET_PROTOCOL, STRUCTURE_EXTENSIONS,
};
use crate::utils::error::DesignError;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Everything needed to run one design job
#[derive(Debug, Clone)]
pub struct DesignRequest {
    /// Target structure (.pdb or .cif)
    pub structure: PathBuf,
    pub target: TargetParams,
    pub protocol: String,
    pub num_designs: u64,
    pub budget: u64,
    /// Diffusion sampling steps, passed as `design sampling.steps=<n>`
    pub steps: u32,
    pub device: Option<DeviceSelector>,
    pub tool: BoltzgenTool,
}

impl Default for DesignRequest {
    fn default() -> Self {
        Self {
            structure: PathBuf::new(),
            target: TargetParams {
                chain: DEFAULT_TARGET_CHAIN.to_string(),
                hotspots: None,
                binder_min: DEFAULT_BINDER_MIN,
                binder_max: DEFAULT_BINDER_MAX,
                cyclic: false,
            },
            protocol: PRESET_PROTOCOL.to_string(),
            num_designs: DEFAULT_JOB_NUM_DESIGNS,
            budget: DEFAULT_JOB_BUDGET,
            steps: DEFAULT_SAMPLING_STEPS,
            device: None,
            tool: BoltzgenTool::default(),
        }
    }
}

/// A prepared job directory
#[derive(Debug, Clone)]
pub struct DesignJob {
    pub id: String,
    /// Absolute job directory
    pub dir: PathBuf,
    /// Copied structure inside `dir`
    pub structure: PathBuf,
    pub spec_path: PathBuf,
}

/// What a finished job produced
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job_id: String,
    pub job_dir: PathBuf,
    pub command_line: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub log_path: PathBuf,
    pub best_structure: Option<PathBuf>,
}

impl DesignJob {
    /// Create the job directory, copy the structure and write the spec
    ///
    /// # Errors
    /// * `DesignError::MissingStructure` / `UnsupportedStructure` - bad target file
    /// * `DesignError::InvalidBinderLength` / `InvalidChain` - bad binder or chain
    /// * `DesignError::Io` - workspace cannot be created or written
    pub fn prepare(workspace: &Path, request: &DesignRequest) -> Result<Self, DesignError> {
        let structure_name = validate_structure(&request.structure)?;
        let spec = DesignSpec::build(&structure_name, &request.target)?;

        let id = new_job_id();
        let dir = workspace.join(&id);
        fs::create_dir_all(&dir)?;
        let dir = fs::canonicalize(&dir)?;
        info!("Prepared job {} in {}", id, dir.display());

        let structure = dir.join(&structure_name);
        fs::copy(&request.structure, &structure)?;
        debug!("Copied {} -> {}", request.structure.display(), structure.display());

        let spec_path = dir.join(DESIGN_SPEC_FILE);
        spec.write(&spec_path)?;

        Ok(Self {
            id,
            dir,
            structure,
            spec_path,
        })
    }

    pub fn invocation(&self, request: &DesignRequest) -> RunInvocation {
        let mut invocation = RunInvocation::new(&self.spec_path, &self.dir)
            .with_override("design", format!("sampling.steps={}", request.steps));
        invocation.tool = request.tool.clone();
        invocation.protocol = request.protocol.clone();
        invocation.num_designs = request.num_designs;
        invocation.budget = request.budget;
        invocation
    }

    pub fn plan(&self, request: &DesignRequest) -> LaunchPlan {
        LaunchPlan::from_invocation(&self.invocation(request), request.device)
            .current_dir(&self.dir)
    }

    /// Run the tool to completion and collect the result
    ///
    /// A non-zero exit is reported through `JobOutcome::success`, not as an
    /// error; only a failure to start the tool is an error.
    pub fn run(&self, request: &DesignRequest) -> Result<JobOutcome, DesignError> {
        let plan = self.plan(request);
        let command_line = plan.command_line();

        let captured = run_captured(&plan)?;
        if !captured.success {
            warn!("Job {} exited with {:?}", self.id, captured.exit_code);
        }

        let log_path = self.dir.join(JOB_LOG_FILE);
        let log = format_job_log(&command_line, &captured.stdout, &captured.stderr);
        fs::write(&log_path, log)?;

        let best_structure = find_best_structure(&self.dir)?;
        match &best_structure {
            Some(path) => info!("Best structure: {}", path.display()),
            None => warn!("No result structures found in {}", self.dir.display()),
        }

        Ok(JobOutcome {
            job_id: self.id.clone(),
            job_dir: self.dir.clone(),
            command_line,
            exit_code: captured.exit_code,
            success: captured.success,
            log_path,
            best_structure,
        })
    }
}

/// Prepare and run in one step
pub fn run_design_job(workspace: &Path, request: &DesignRequest) -> Result<JobOutcome, DesignError> {
    let job = DesignJob::prepare(workspace, request)?;
    job.run(request)
}

/// `run_` plus the first 8 hex digits of a v4 UUID
pub fn new_job_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("run_{}", &uuid[..8])
}

pub fn format_job_log(command_line: &str, stdout: &str, stderr: &str) -> String {
    format!(
        "=== CMD ===\n{}\n\n=== STDOUT ===\n{}\n=== STDERR ===\n{}",
        command_line, stdout, stderr
    )
}

/// Check the target exists with a supported extension; returns its file name
fn validate_structure(path: &Path) -> Result<String, DesignError> {
    if !path.is_file() {
        return Err(DesignError::MissingStructure(path.to_path_buf()));
    }

    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| STRUCTURE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(DesignError::UnsupportedStructure(path.to_path_buf()));
    }

    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DesignError::MissingStructure(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_format() {
        let id = new_job_id();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("run_"));
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_job_id(), new_job_id());
    }

    #[test]
    fn test_job_log_layout() {
        let log = format_job_log("boltzgen run x", "out\n", "err\n");
        assert_eq!(
            log,
            "=== CMD ===\nboltzgen run x\n\n=== STDOUT ===\nout\n\n=== STDERR ===\nerr\n"
        );
    }

    #[test]
    fn test_prepare_rejects_missing_structure() {
        let workspace = tempfile::tempdir().unwrap();
        let request = DesignRequest {
            structure: workspace.path().join("nope.pdb"),
            ..Default::default()
        };

        let err = DesignJob::prepare(workspace.path(), &request).unwrap_err();
        assert!(matches!(err, DesignError::MissingStructure(_)));
    }

    #[test]
    fn test_prepare_rejects_unsupported_extension() {
        let workspace = tempfile::tempdir().unwrap();
        let structure = workspace.path().join("target.txt");
        fs::write(&structure, "ATOM").unwrap();

        let request = DesignRequest {
            structure,
            ..Default::default()
        };
        let err = DesignJob::prepare(workspace.path(), &request).unwrap_err();
        assert!(matches!(err, DesignError::UnsupportedStructure(_)));
    }

    #[test]
    fn test_prepare_writes_workspace() {
        let workspace = tempfile::tempdir().unwrap();
        let structure = workspace.path().join("target.pdb");
        fs::write(&structure, "ATOM      1  N   ALA A   1\n").unwrap();

        let request = DesignRequest {
            structure,
            ..Default::default()
        };
        let job = DesignJob::prepare(&workspace.path().join("jobs"), &request).unwrap();

        assert!(job.dir.is_absolute());
        assert!(job.dir.ends_with(&job.id));
        assert!(job.structure.is_file());
        assert_eq!(job.structure.file_name().unwrap(), "target.pdb");

        let yaml = fs::read_to_string(&job.spec_path).unwrap();
        assert!(yaml.contains("path: target.pdb"));
    }

    #[test]
    fn test_plan_arguments() {
        let workspace = tempfile::tempdir().unwrap();
        let structure = workspace.path().join("target.cif");
        fs::write(&structure, "data_").unwrap();

        let request = DesignRequest {
            structure,
            num_designs: 4,
            budget: 2,
            steps: 30,
            device: Some(DeviceSelector::new(1)),
            ..Default::default()
        };
        let job = DesignJob::prepare(workspace.path(), &request).unwrap();
        let plan = job.plan(&request);

        assert_eq!(plan.current_dir.as_deref(), Some(job.dir.as_path()));
        let line = plan.command_line();
        assert!(line.starts_with("boltzgen run "));
        assert!(line.contains("--num_designs 4 --budget 2"));
        assert!(line.ends_with("--config design sampling.steps=30"));
        assert_eq!(plan.env[0].1, "1");
    }
}
