//! Error types for the controller

use std::path::PathBuf;

use codex_core::motion::{DescentError, MotionError};
use thiserror::Error;

/// Fatal run errors
///
/// Anything that reaches the caller has already had suction switched off.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("motion failed: {0}")]
    Motion(#[from] MotionError),

    #[error("descent aborted: {0}")]
    Descent(#[from] DescentError),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
