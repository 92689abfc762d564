// src/config/loader.rs

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MonodiffError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Environment variable carrying the Buildkite plugin configuration.
pub const PLUGINS_ENV_VAR: &str = "BUILDKITE_PLUGINS";

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "monodiff.toml";

/// Substring identifying this plugin in the `BUILDKITE_PLUGINS` array.
pub const PLUGIN_NAME: &str = "monorepo-diff";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_path_with(&RealFileSystem, path)
}

/// Same as [`load_from_path`], reading through the given filesystem.
pub fn load_from_path_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| MonodiffError::ConfigError(format!("cannot read {}: {e:#}", path.display())))?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), watch_entries = config.watch.len(), "loaded config file");

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Resolves `env` entries against the process environment.
/// - Rejects duplicate watch keys and malformed patterns.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Extract this plugin's configuration from a `BUILDKITE_PLUGINS` payload.
///
/// The payload is a JSON array of single-entry objects keyed by plugin
/// reference, e.g. `[{"github.com/org/monorepo-diff-buildkite-plugin#v1": {...}}]`.
/// The first entry whose reference contains [`PLUGIN_NAME`] wins.
pub fn load_from_plugins_json(json: &str) -> Result<RawConfigFile> {
    let plugins: Vec<BTreeMap<String, serde_json::Value>> = serde_json::from_str(json)?;

    for plugin in plugins {
        for (reference, config) in plugin {
            if reference.contains(PLUGIN_NAME) {
                debug!(%reference, "found plugin configuration");
                let config: RawConfigFile = serde_json::from_value(config)?;
                return Ok(config);
            }
        }
    }

    Err(MonodiffError::ConfigError(format!(
        "no plugin matching '{PLUGIN_NAME}' found in {PLUGINS_ENV_VAR}"
    )))
}

/// Load and validate the configuration from [`PLUGINS_ENV_VAR`].
pub fn load_from_env() -> Result<ConfigFile> {
    let json = std::env::var(PLUGINS_ENV_VAR)
        .map_err(|_| MonodiffError::ConfigError(format!("{PLUGINS_ENV_VAR} is not set")))?;
    let raw = load_from_plugins_json(&json)?;
    ConfigFile::try_from(raw)
}
