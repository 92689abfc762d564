// src/select/rule.rs

use crate::types::Step;

/// A watch rule: path patterns mapped onto a step template.
///
/// Built from the `watch = [...]` entries of the config, or directly by
/// library callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchRule {
    /// Glob patterns or directory prefixes, relative to the repository root.
    pub patterns: Vec<String>,
    /// Optional identifier; an empty string is treated as absent.
    pub key: Option<String>,
    /// Keys of other rules this one depends on, in declared order.
    pub depends_on: Vec<String>,
    /// Template for the emitted step. Never mutated by selection.
    pub step: Step,
}

impl WatchRule {
    pub fn new<I, S>(patterns: I, step: Step) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            key: None,
            depends_on: Vec::new(),
            step,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_depends_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = keys.into_iter().map(Into::into).collect();
        self
    }

    /// The declared key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}
