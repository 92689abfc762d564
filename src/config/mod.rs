// src/config/mod.rs

//! Configuration loading and validation for monodiff.
//!
//! Responsibilities:
//! - Define the TOML/JSON-backed data model (`model.rs`).
//! - Load a config file from disk or from `BUILDKITE_PLUGINS` (`loader.rs`).
//! - Resolve `env` entries (`env.rs`).
//! - Validate the watch rules and build the step templates (`validate.rs`).

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_env, load_from_path, load_from_plugins_json};
pub use model::{ConfigFile, EnvSpec, HookConfig, PathSpec, RawConfigFile, RawWatchConfig, RawStepConfig, RawBuildConfig};
pub use validate::validate_rules;
