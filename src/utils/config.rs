//! Configuration and constants for the launcher.

/// Default executable name, resolved through `PATH`
pub const DEFAULT_TOOL: &str = "boltzgen";

/// Subcommand passed to the tool for every invocation
pub const RUN_SUBCOMMAND: &str = "run";

/// Environment variable that pins the child to one accelerator
pub const DEVICE_ENV_VAR: &str = "CUDA_VISIBLE_DEVICES";

/// Environment variable consulted by `launch --tool`
pub const TOOL_ENV_VAR: &str = "BOLTZGEN_BIN";

/// Launch record schema version
pub const RECORD_SCHEMA_VERSION: &str = "1.0.0";

/// Suffix appended to the log path for the launch record
pub const RECORD_SUFFIX: &str = ".launch.json";

// The fixed gpr75 peptide run. `boltzgen-launch` with no subcommand
// launches exactly this and nothing else.
pub const PRESET_CONFIG: &str = "example/gpr75/gpr75.yaml";
pub const PRESET_OUTPUT: &str = "workbench/gpr75_run2";
pub const PRESET_PROTOCOL: &str = "peptide-anything";
pub const PRESET_NUM_DESIGNS: u64 = 10_000;
pub const PRESET_BUDGET: u64 = 20;
pub const PRESET_DEVICE: u32 = 6;
pub const PRESET_LOG: &str = "nohup_logs/gpr75_run2.log";

// Design job defaults
pub const DEFAULT_WORKSPACE: &str = "gradio_workspace";
pub const DESIGN_SPEC_FILE: &str = "design_spec.yaml";
pub const JOB_LOG_FILE: &str = "job.log";
pub const VIEWER_FILE: &str = "viewer.html";
pub const DEFAULT_TARGET_CHAIN: &str = "A";
pub const DEFAULT_BINDER_MIN: u32 = 8;
pub const DEFAULT_BINDER_MAX: u32 = 16;
pub const DEFAULT_JOB_NUM_DESIGNS: u64 = 2;
pub const DEFAULT_JOB_BUDGET: u64 = 1;
pub const DEFAULT_SAMPLING_STEPS: u32 = 50;
pub const MIN_SAMPLING_STEPS: u32 = 10;
pub const MAX_SAMPLING_STEPS: u32 = 200;

/// Protocols the job runner offers
pub const KNOWN_PROTOCOLS: &[&str] = &["peptide-anything", "protein-anything"];

/// Result directories in order of preference
pub const RESULT_DIRS: &[&str] = &["final_ranked_designs", "intermediate_designs"];

/// Structure extensions accepted as targets and collected as results
pub const STRUCTURE_EXTENSIONS: &[&str] = &["pdb", "cif"];
