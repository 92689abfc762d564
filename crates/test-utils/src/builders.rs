#![allow(dead_code)]

use monodiff::config::{ConfigFile, HookConfig, RawConfigFile};
use monodiff::select::WatchRule;
use monodiff::types::Step;

/// Builder for `WatchRule` to simplify test setup.
pub struct WatchRuleBuilder {
    rule: WatchRule,
}

impl WatchRuleBuilder {
    /// A rule triggering the pipeline `trigger`.
    pub fn new(trigger: &str) -> Self {
        Self {
            rule: WatchRule::new(Vec::<String>::new(), Step::trigger(trigger)),
        }
    }

    pub fn path(mut self, pattern: &str) -> Self {
        self.rule.patterns.push(pattern.to_string());
        self
    }

    pub fn key(mut self, key: &str) -> Self {
        self.rule.key = Some(key.to_string());
        self
    }

    pub fn depends_on(mut self, key: &str) -> Self {
        self.rule.depends_on.push(key.to_string());
        self
    }

    /// Pre-populate the template's own key.
    pub fn step_key(mut self, key: &str) -> Self {
        self.rule.step.key = Some(key.to_string());
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.rule.step = step;
        self
    }

    pub fn build(self) -> WatchRule {
        self.rule
    }
}

/// Builder for a validated `ConfigFile`.
pub struct ConfigFileBuilder {
    raw: RawConfigFile,
    rules: Vec<WatchRule>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawConfigFile::default(),
            rules: Vec::new(),
        }
    }

    pub fn diff(mut self, command: &str) -> Self {
        self.raw.diff = command.to_string();
        self
    }

    pub fn wait(mut self, val: bool) -> Self {
        self.raw.wait = val;
        self
    }

    pub fn interpolation(mut self, val: bool) -> Self {
        self.raw.interpolation = val;
        self
    }

    pub fn hook(mut self, command: &str) -> Self {
        self.raw.hooks.push(HookConfig {
            command: command.to_string(),
        });
        self
    }

    pub fn with_rule(mut self, rule: WatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate with an empty environment, then attach the rules.
    pub fn build(self) -> ConfigFile {
        let mut cfg = ConfigFile::from_raw_with_env(self.raw, &|_: &str| None)
            .expect("Failed to build valid config from builder");
        monodiff::config::validate_rules(&self.rules).expect("invalid rules in builder");
        cfg.watch = self.rules;
        cfg
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
