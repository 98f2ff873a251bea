//! Design jobs: a workspace per run, a generated spec, a blocking tool run.

pub mod job;
pub mod results;
pub mod spec;

pub use job::{run_design_job, DesignJob, DesignRequest, JobOutcome};
pub use results::find_best_structure;
pub use spec::{DesignSpec, TargetParams};
