//! Command error taxonomy
//!
//! The wire response reports only a boolean error flag; these variants exist
//! for host-side logging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a command can fail with, in either real or test mode
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("parameters not found: {0}")]
    ParametersNotFound(String),

    #[error("movie file already exists: {}", .0.display())]
    OverwriteDenied(PathBuf),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("command deadline exceeded")]
    DeadlineExceeded,

    /// Motion or acquisition failed on the host side
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
