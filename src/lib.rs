//! boltzgen-launch
//!
//! Starts `boltzgen run` detached from the invoking session, pinned to one
//! accelerator, with all output appended to a log file. Also runs
//! interactive design jobs: a fresh workspace, a generated design spec and a
//! blocking run with captured output.
//!
//! ## Getting Started
//!
//! ```bash
//! # launch the fixed gpr75 run in the background
//! boltzgen-launch
//!
//! # the same, with different values
//! boltzgen-launch launch example/x.yaml --output workbench/x --device 2 --log logs/x.log
//! ```

pub mod commands;
pub mod design;
pub mod launch;
pub mod output;
pub mod utils;
