// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonodiffError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Two watch rules declare the same non-empty key.
    #[error("Configuration error: duplicate watch key '{key}' (rules #{first} and #{second})")]
    DuplicateKey {
        key: String,
        first: usize,
        second: usize,
    },

    #[error("Configuration error: invalid watch pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("diff command `{command}` failed: {reason}")]
    DiffFailed { command: String, reason: String },

    #[error("pipeline upload failed: {0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MonodiffError {
    /// True for errors caused by the caller's watch/plugin configuration.
    ///
    /// These are never retried and map to a non-zero exit.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            MonodiffError::ConfigError(_)
                | MonodiffError::DuplicateKey { .. }
                | MonodiffError::InvalidPattern { .. }
                | MonodiffError::TomlError(_)
                | MonodiffError::JsonError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MonodiffError>;
