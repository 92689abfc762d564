// src/types.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single entry of the generated pipeline.
///
/// Only `key` and `depends_on` are interpreted by the selector; everything
/// else is build metadata passed through to the orchestrator untouched.
///
/// Field order here is the order in which the fields are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Name of the sub-pipeline to trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Build::is_empty")]
    pub build: Build,

    /// Command step body (`command: "make"` or a list of commands).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    #[serde(default, rename = "async", skip_serializing_if = "is_false")]
    pub r#async: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_fail: Option<SoftFail>,

    /// Stable identifier other steps can reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Keys of steps this one waits for.
    ///
    /// `None` and `Some(vec![])` are different documents; the selector never
    /// produces the latter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
}

impl Step {
    /// Convenience constructor for a trigger step.
    pub fn trigger(name: impl Into<String>) -> Self {
        Self {
            trigger: Some(name.into()),
            ..Self::default()
        }
    }

    /// A trigger step invokes another pipeline; a command step runs inline.
    pub fn is_trigger(&self) -> bool {
        self.trigger.is_some()
    }
}

/// `build:` attributes forwarded to the triggered pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Build {
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.branch.is_none() && self.commit.is_none() && self.env.is_empty()
    }
}

/// `command` accepts either a single string or a list of commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Single(String),
    Multiple(Vec<String>),
}

/// `soft_fail: true` or `soft_fail: [{ exit_status: 1 }, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoftFail {
    Flag(bool),
    Rules(Vec<SoftFailRule>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftFailRule {
    pub exit_status: ExitStatus,
}

/// A concrete exit code or the `"*"` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExitStatus {
    Code(i64),
    Any(String),
}

fn is_false(value: &bool) -> bool {
    !*value
}
