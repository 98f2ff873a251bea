//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while starting a detached process
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Cannot open log file {path}: {source}")]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while preparing or running a design job
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Invalid binder length range {min}..{max}")]
    InvalidBinderLength { min: u32, max: u32 },

    #[error("Invalid chain id: {0:?}")]
    InvalidChain(String),

    #[error("Structure file not found: {0}")]
    MissingStructure(PathBuf),

    #[error("Unsupported structure format: {0} (expected .pdb or .cif)")]
    UnsupportedStructure(PathBuf),

    #[error("Failed to serialize design spec: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
