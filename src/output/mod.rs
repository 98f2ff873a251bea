//! Output writers for launch records and viewer pages.
//!
//! This module handles writing data to disk:
//! - JSON launch records
//! - HTML structure viewers

pub mod record;
pub mod viewer;

// Re-export main functions
pub use record::{read_record, record_path_for, write_record, LaunchRecord};
pub use viewer::{render_viewer, write_viewer, StructureFormat};
