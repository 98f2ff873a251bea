//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod design;
pub mod launch;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use design::execute_design;
pub use launch::{execute_launch, execute_preset, validate_args};
pub use models::{DesignArgs, LaunchArgs};
pub use utils::{display_version, inspect_record, render_structure};
