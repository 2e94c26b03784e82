// ============================================================================
// vidsqueeze-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// This module defines the error type shared by every part of the core
// library. Per-file failures (probe, encode, consistency) are represented
// here too, but the pipeline converts them into filing transitions instead of
// propagating them out of a run.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the vidsqueeze core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory traversal error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Command '{cmd}' failed with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    /// Media metadata is unreadable, missing or non-numeric.
    #[error("Probe failure: {0}")]
    ProbeFailure(String),

    /// The encoding backend failed to produce an output file.
    #[error("Encode failure: {0}")]
    EncodeFailure(String),

    /// A companion file expected by the stronger pass is missing.
    #[error("Consistency failure: {0}")]
    ConsistencyFailure(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("JSON error: {0}")]
    JsonParseError(String),

    #[error("No processable video files found")]
    NoFilesFound,

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for vidsqueeze core operations.
pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub(crate) fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub(crate) fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonParseError(err.to_string())
    }
}
