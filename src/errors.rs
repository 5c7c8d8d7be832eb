//! Typed error definitions for backup_preflight.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("unable to determine available disk space for {0}")]
    ProbeFailed(PathBuf),

    #[error("Insufficient disk space for destination {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Destination is not a usable directory: {0}")]
    DestinationInvalid(PathBuf),
}

impl PreflightError {
    /// Stable machine-readable code for structured log events.
    pub fn code(&self) -> &'static str {
        match self {
            PreflightError::ProbeFailed(_) => "probe_failed",
            PreflightError::InsufficientSpace { .. } => "insufficient_space",
            PreflightError::DestinationInvalid(_) => "destination_invalid",
        }
    }
}
