//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("options file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("failed to load options: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to parse TOML options: {0}")]
    Parse(#[from] toml::de::Error),
}
