// src/select/patterns.rs

use std::fmt;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::errors::{MonodiffError, Result};

/// The only wildcard. `**` is two of them.
const WILDCARD: char = '*';

/// Compiled patterns of a single watch rule.
///
/// Patterns come in two flavours:
///
/// - patterns without `*` are directory-scope prefixes: `"services/api"`
///   matches `"services/api"` itself and anything beneath it, but not
///   `"services/api-gateway/x"`. A trailing `/` is ignored.
/// - patterns with `*` are anchored globs over the whole path. `*` stays
///   inside one path segment and `**` spans zero or more segments. Other
///   glob syntax (`?`, `[...]`, `{a,b}`) is matched literally, so directory
///   names such as `pages/[id]` work in both forms.
#[derive(Clone, Default)]
pub struct RuleMatcher {
    prefixes: Vec<String>,
    globs: Option<GlobSet>,
}

impl fmt::Debug for RuleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleMatcher")
            .field("prefixes", &self.prefixes)
            .field("globs", &self.globs.as_ref().map(GlobSet::len))
            .finish()
    }
}

impl RuleMatcher {
    /// Compile a rule's patterns. Fails on empty or malformed globs.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut prefixes = Vec::new();
        let mut builder = GlobSetBuilder::new();
        let mut glob_count = 0usize;

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if pattern.trim().is_empty() {
                return Err(MonodiffError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "pattern is empty".to_string(),
                });
            }

            if is_glob(pattern) {
                let glob = GlobBuilder::new(&escape_literals(pattern))
                    .literal_separator(true)
                    .build()
                    .map_err(|e| MonodiffError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })?;
                builder.add(glob);
                glob_count += 1;
            } else {
                let prefix = pattern.trim_end_matches('/');
                // "/" alone would otherwise collapse to an empty prefix.
                let prefix = if prefix.is_empty() { pattern } else { prefix };
                prefixes.push(prefix.to_string());
            }
        }

        let globs = if glob_count == 0 {
            None
        } else {
            Some(builder.build().map_err(|e| MonodiffError::InvalidPattern {
                pattern: patterns
                    .iter()
                    .map(|p| p.as_ref())
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: e.to_string(),
            })?)
        };

        Ok(Self { prefixes, globs })
    }

    /// True if any pattern of the rule matches `path`.
    pub fn is_match(&self, path: &str) -> bool {
        if self.prefixes.iter().any(|dir| prefix_match(dir, path)) {
            return true;
        }
        self.globs.as_ref().is_some_and(|set| set.is_match(path))
    }

    /// True if any changed file matches any pattern. Stops at the first hit.
    pub fn any_match<S: AsRef<str>>(&self, changed_files: &[S]) -> bool {
        changed_files.iter().any(|f| self.is_match(f.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.globs.is_none()
    }
}

/// Match a single pattern against a single path.
///
/// Malformed patterns never match; use [`RuleMatcher::new`] to surface them
/// as errors instead.
pub fn matches(pattern: &str, path: &str) -> bool {
    match RuleMatcher::new(&[pattern]) {
        Ok(matcher) => matcher.is_match(path),
        Err(err) => {
            debug!(%pattern, error = %err, "ignoring unusable pattern");
            false
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(WILDCARD)
}

/// Wrap every glob metacharacter except `*` in a character class.
fn escape_literals(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '?' | '[' | ']' | '{' | '}' => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn prefix_match(dir: &str, path: &str) -> bool {
    match path.strip_prefix(dir) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
