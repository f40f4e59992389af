//! Configuration loading
//!
//! Reads a TOML file if one is given, falls back to the embedded default
//! otherwise, then applies environment overrides and validates.

use std::env;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{RigConfig, ENV_STAGE_API_KEY, ENV_STAGE_URL};
use crate::error::ConfigError;

/// Default configuration compiled into the binary (checked by build.rs)
pub const EMBEDDED_CONFIG: &str = include_str!("../../rig.toml");

/// Parse and validate a TOML configuration
pub fn parse_config(content: &str) -> Result<RigConfig, ConfigError> {
    let config: RigConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load the rig configuration
///
/// Uses the file at `path` if given, the embedded default otherwise.
/// Stage connection settings can be overridden from the environment.
pub fn load_config(path: Option<&Path>) -> Result<RigConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_config(&content)?
        }
        None => {
            info!("using embedded configuration");
            parse_config(EMBEDDED_CONFIG)?
        }
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok());
    Ok(config)
}

/// Override stage settings from a variable lookup
///
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut RigConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_STAGE_URL).filter(|v| !v.is_empty()) {
        debug!(%url, "stage url from environment");
        config.stage.url = url;
    }

    if let Some(key) = lookup(ENV_STAGE_API_KEY).filter(|v| !v.is_empty()) {
        debug!("stage api key from environment");
        config.stage.api_key = key;
    }
}
