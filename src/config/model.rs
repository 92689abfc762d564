// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::select::WatchRule;
use crate::types::{CommandSpec, SoftFail};

/// Default diff command when the config does not set one.
pub const DEFAULT_DIFF_COMMAND: &str = "git diff --name-only HEAD~1";

/// Configuration as read from TOML (or the plugin JSON), before validation.
///
/// ```toml
/// diff = "git diff --name-only origin/main...HEAD"
/// wait = true
/// env = ["DEPLOY_ENV=staging", "AWS_REGION"]
///
/// [[hooks]]
/// command = "echo done"
///
/// [[watch]]
/// path = ["services/api", "libs/**/*.proto"]
/// key = "api"
/// depends_on = ["protos"]
/// config = { trigger = "api-pipeline", build = { message = "api changed" } }
/// ```
///
/// Every field is optional and has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Shell command printing one changed path per line.
    #[serde(default = "default_diff")]
    pub diff: String,

    /// Append a `wait` step after the selected steps.
    #[serde(default)]
    pub wait: bool,

    /// When true, the upload is run with `--no-interpolation`.
    #[serde(default = "default_interpolation")]
    pub interpolation: bool,

    /// Log level name (error, warn, info, debug, trace).
    #[serde(default)]
    pub log_level: Option<String>,

    /// Command steps appended after the selected steps.
    #[serde(default)]
    pub hooks: Vec<HookConfig>,

    /// Environment forwarded into every trigger step's `build.env`.
    #[serde(default)]
    pub env: EnvSpec,

    #[serde(default)]
    pub watch: Vec<RawWatchConfig>,
}

fn default_diff() -> String {
    DEFAULT_DIFF_COMMAND.to_string()
}

fn default_interpolation() -> bool {
    true
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            diff: default_diff(),
            wait: false,
            interpolation: default_interpolation(),
            log_level: None,
            hooks: Vec::new(),
            env: EnvSpec::default(),
            watch: Vec::new(),
        }
    }
}

/// `[[hooks]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HookConfig {
    pub command: String,
}

/// `[[watch]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWatchConfig {
    /// One pattern or a list of patterns.
    #[serde(default)]
    pub path: PathSpec,

    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Step template emitted when the rule triggers.
    #[serde(default)]
    pub config: RawStepConfig,
}

/// `path = "a"` or `path = ["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    Single(String),
    Multiple(Vec<String>),
}

impl Default for PathSpec {
    fn default() -> Self {
        PathSpec::Multiple(Vec::new())
    }
}

impl PathSpec {
    pub fn into_patterns(self) -> Vec<String> {
        match self {
            PathSpec::Single(p) => vec![p],
            PathSpec::Multiple(ps) => ps,
        }
    }
}

/// Environment given as `["KEY=VALUE", "KEY"]` or as a table.
///
/// Bare `KEY` entries take their value from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvSpec {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Default for EnvSpec {
    fn default() -> Self {
        EnvSpec::List(Vec::new())
    }
}

/// The `config = { ... }` step template of a watch entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStepConfig {
    #[serde(default)]
    pub trigger: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub command: Option<CommandSpec>,

    #[serde(default)]
    pub agents: BTreeMap<String, String>,

    #[serde(default)]
    pub artifacts: Vec<String>,

    #[serde(default)]
    pub env: EnvSpec,

    #[serde(default, rename = "async")]
    pub r#async: bool,

    #[serde(default)]
    pub soft_fail: Option<SoftFail>,

    /// Pre-populated step key; overridden by the watch entry's `key`.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub build: RawBuildConfig,
}

/// `build = { ... }` for trigger steps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBuildConfig {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub commit: Option<String>,

    #[serde(default)]
    pub env: EnvSpec,
}

/// Validated configuration with environment resolved and watch entries
/// turned into [`WatchRule`]s.
///
/// Construct through `ConfigFile::try_from(raw)` or
/// [`ConfigFile::from_raw_with_env`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub diff: String,
    pub wait: bool,
    pub interpolation: bool,
    pub log_level: Option<String>,
    pub hooks: Vec<HookConfig>,
    pub env: BTreeMap<String, String>,
    pub watch: Vec<WatchRule>,
}

impl ConfigFile {
    pub fn hook_commands(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|h| h.command.as_str())
    }
}
