//! Configuration module for sessionkey.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `SESSIONKEY_MACHINE_ID` | No | hostname | Machine identifier used in project keys |
//! | `SESSIONKEY_HOME` | No | user home | Directory a leading `~` expands to |
//! | `SESSIONKEY_CLAUDE_DIR` | No | `~/.claude` | Claude Code directory |
//!
//! # Example
//!
//! ```no_run
//! use sessionkey::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("Machine: {}", config.machine_id);
//! ```

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

use crate::normalize::PathNormalizer;

/// Default Claude Code directory name relative to home.
pub const DEFAULT_CLAUDE_DIR: &str = ".claude";

const MACHINE_ID_VAR: &str = "SESSIONKEY_MACHINE_ID";
const HOME_VAR: &str = "SESSIONKEY_HOME";
const CLAUDE_DIR_VAR: &str = "SESSIONKEY_CLAUDE_DIR";

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for sessionkey.
#[derive(Debug, Clone)]
pub struct Config {
    /// Machine identifier prefixed onto every project key.
    pub machine_id: String,

    /// Directory that a leading `~` in raw paths expands to.
    pub home_dir: PathBuf,

    /// Path to the Claude Code directory holding `projects/`.
    pub claude_dir: PathBuf,
}

/// Values supplied on the command line, taking precedence over the environment.
///
/// A field that is `Some` replaces the matching environment variable
/// entirely, so the variable is neither read nor validated.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub machine_id: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub claude_dir: Option<PathBuf>,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env_with`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Creates a new `Config` from `overrides`, falling back to environment
    /// variables and then to defaults.
    ///
    /// Without an overridden or configured Claude directory, the default
    /// `.claude` follows the resolved home directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - a machine id, home directory or Claude directory is set but blank
    /// - The home directory cannot be determined and none was supplied
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let machine_id = match &overrides.machine_id {
            Some(val) => non_blank("--machine-id", val, "machine id cannot be empty")?,
            None => match env::var(MACHINE_ID_VAR) {
                Ok(val) => non_blank(MACHINE_ID_VAR, &val, "machine id cannot be empty")?,
                Err(_) => get_hostname(),
            },
        };

        let home_dir = match &overrides.home_dir {
            Some(path) => {
                non_blank("--home", &path.to_string_lossy(), "home directory cannot be empty")?;
                path.clone()
            }
            None => match env::var(HOME_VAR) {
                Ok(val) => PathBuf::from(non_blank(
                    HOME_VAR,
                    &val,
                    "home directory cannot be empty",
                )?),
                Err(_) => BaseDirs::new()
                    .ok_or(ConfigError::NoHomeDirectory)?
                    .home_dir()
                    .to_path_buf(),
            },
        };

        let claude_dir = match &overrides.claude_dir {
            Some(path) => {
                non_blank(
                    "--claude-dir",
                    &path.to_string_lossy(),
                    "Claude directory cannot be empty",
                )?;
                path.clone()
            }
            None => match env::var(CLAUDE_DIR_VAR) {
                Ok(val) => PathBuf::from(non_blank(
                    CLAUDE_DIR_VAR,
                    &val,
                    "Claude directory cannot be empty",
                )?),
                Err(_) => home_dir.join(DEFAULT_CLAUDE_DIR),
            },
        };

        Ok(Self {
            machine_id,
            home_dir,
            claude_dir,
        })
    }

    /// Builds a normalizer that expands `~` against the configured home.
    #[must_use]
    pub fn normalizer(&self) -> PathNormalizer {
        PathNormalizer::with_home(self.home_dir.to_string_lossy())
    }
}

/// Returns `val` trimmed, or an `InvalidValue` error for `key` if it is blank.
fn non_blank(key: &str, val: &str, message: &str) -> Result<String, ConfigError> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Gets the system hostname, falling back to "unknown" if it cannot be determined.
fn get_hostname() -> String {
    gethostname::gethostname()
        .into_string()
        .unwrap_or_else(|_| "unknown".to_string())
}
