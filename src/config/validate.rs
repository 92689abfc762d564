// src/config/validate.rs

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::config::env::{BUILDKITE_BRANCH, BUILDKITE_COMMIT, BUILDKITE_MESSAGE, process_env, resolve_env};
use crate::config::model::{ConfigFile, RawConfigFile, RawStepConfig, RawWatchConfig};
use crate::errors::{MonodiffError, Result};
use crate::select::cascade::index_keys;
use crate::select::{RuleMatcher, WatchRule};
use crate::types::{Build, Step};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::MonodiffError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ConfigFile::from_raw_with_env(raw, &process_env)
    }
}

impl ConfigFile {
    /// Validate `raw` and resolve its environment through `lookup`.
    ///
    /// `lookup` stands in for the process environment so tests stay hermetic.
    pub fn from_raw_with_env(raw: RawConfigFile, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        validate_global_config(&raw)?;

        let env = resolve_env(&raw.env, lookup);
        let watch: Vec<WatchRule> = raw
            .watch
            .into_iter()
            .map(|w| watch_rule_from_raw(w, &env, lookup))
            .collect();

        validate_rules(&watch)?;

        Ok(ConfigFile {
            diff: raw.diff,
            wait: raw.wait,
            interpolation: raw.interpolation,
            log_level: raw.log_level,
            hooks: raw.hooks,
            env,
            watch,
        })
    }
}

/// Check a rule set before selection runs.
///
/// Errors: duplicate non-empty keys and malformed patterns. Rules without
/// patterns and dangling `depends_on` entries are allowed but logged.
pub fn validate_rules(rules: &[WatchRule]) -> Result<()> {
    let owners = index_keys(rules)?;

    for (idx, rule) in rules.iter().enumerate() {
        let matcher = RuleMatcher::new(rule.patterns.as_slice())?;
        if matcher.is_empty() {
            warn!(rule = idx, key = ?rule.key(), "watch entry has no paths; it can only be triggered by a dependency");
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for dep in rule.depends_on.iter() {
            if !seen.insert(dep.as_str()) {
                debug!(rule = idx, dependency = %dep, "dependency listed more than once");
            }
            if !owners.contains_key(dep.as_str()) {
                debug!(rule = idx, dependency = %dep, "depends_on references an unknown key");
            }
            if rule.key() == Some(dep.as_str()) {
                warn!(rule = idx, dependency = %dep, "watch entry depends on itself");
            }
        }
    }

    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.diff.trim().is_empty() {
        return Err(MonodiffError::ConfigError(
            "`diff` must be a non-empty shell command".to_string(),
        ));
    }

    for (idx, hook) in cfg.hooks.iter().enumerate() {
        if hook.command.trim().is_empty() {
            return Err(MonodiffError::ConfigError(format!(
                "hooks[{idx}].command must not be empty"
            )));
        }
    }

    Ok(())
}

fn watch_rule_from_raw(
    raw: RawWatchConfig,
    plugin_env: &BTreeMap<String, String>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> WatchRule {
    WatchRule {
        patterns: raw.path.into_patterns(),
        key: raw.key,
        depends_on: raw.depends_on,
        step: step_from_raw(raw.config, plugin_env, lookup),
    }
}

/// Build the step template, filling trigger-step defaults.
///
/// For trigger steps, unset `build.message/branch/commit` fall back to the
/// current Buildkite build, and the top-level `env` is merged into
/// `build.env` without overriding step-level entries.
fn step_from_raw(
    raw: RawStepConfig,
    plugin_env: &BTreeMap<String, String>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Step {
    let mut step = Step {
        trigger: raw.trigger,
        label: raw.label,
        build: Build {
            message: raw.build.message,
            branch: raw.build.branch,
            commit: raw.build.commit,
            env: resolve_env(&raw.build.env, lookup),
        },
        command: raw.command,
        agents: raw.agents,
        artifacts: raw.artifacts,
        env: resolve_env(&raw.env, lookup),
        r#async: raw.r#async,
        soft_fail: raw.soft_fail,
        key: raw.key,
        depends_on: None,
    };

    if step.is_trigger() {
        let build = &mut step.build;
        build.message = build.message.take().or_else(|| lookup(BUILDKITE_MESSAGE));
        build.branch = build.branch.take().or_else(|| lookup(BUILDKITE_BRANCH));
        build.commit = build.commit.take().or_else(|| lookup(BUILDKITE_COMMIT));
        for (k, v) in plugin_env {
            build.env.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }

    step
}
