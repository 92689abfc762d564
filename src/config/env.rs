// src/config/env.rs

//! Resolution of `env` entries against the process environment.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::model::EnvSpec;

/// Buildkite variables used as defaults for trigger steps' `build` section.
pub const BUILDKITE_MESSAGE: &str = "BUILDKITE_MESSAGE";
pub const BUILDKITE_BRANCH: &str = "BUILDKITE_BRANCH";
pub const BUILDKITE_COMMIT: &str = "BUILDKITE_COMMIT";

/// Read a variable from the real process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Turn an [`EnvSpec`] into concrete `KEY -> VALUE` pairs.
///
/// - `KEY=VALUE` is taken literally (only the first `=` splits).
/// - a bare `KEY` is looked up through `lookup`; unset keys are dropped.
/// - blank entries are skipped.
pub fn resolve_env(spec: &EnvSpec, lookup: &dyn Fn(&str) -> Option<String>) -> BTreeMap<String, String> {
    match spec {
        EnvSpec::Map(map) => map.clone(),
        EnvSpec::List(entries) => {
            let mut env = BTreeMap::new();
            for entry in entries {
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }
                match entry.split_once('=') {
                    Some((key, value)) => {
                        env.insert(key.trim().to_string(), value.to_string());
                    }
                    None => match lookup(entry) {
                        Some(value) => {
                            env.insert(entry.to_string(), value);
                        }
                        None => debug!(key = %entry, "env key not set in environment; skipping"),
                    },
                }
            }
            env
        }
    }
}
