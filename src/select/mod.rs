// src/select/mod.rs

//! Step selection: the part of `monodiff` that decides what to trigger.
//!
//! - [`patterns`] matches changed paths against a rule's watch patterns.
//! - [`cascade`] propagates triggers along `depends_on` edges and filters
//!   each rule's dependency list down to triggered keys.
//! - [`annotate`] turns a triggered rule into the step to emit.
//!
//! Everything here is synchronous and free of I/O.

pub mod annotate;
pub mod cascade;
pub mod patterns;
pub mod rule;

use tracing::info;

use crate::errors::Result;
use crate::types::Step;

pub use annotate::annotate_step;
pub use cascade::{ResolvedRule, TriggerReason, resolve};
pub use patterns::{RuleMatcher, matches};
pub use rule::WatchRule;

/// Select the steps to emit for a set of changed files.
///
/// Steps come out in rule declaration order. No changed files means no
/// steps. Only a structurally invalid rule set is an error.
pub fn select_steps<S: AsRef<str>>(changed_files: &[S], rules: &[WatchRule]) -> Result<Vec<Step>> {
    let resolved = resolve(changed_files, rules)?;

    let steps: Vec<Step> = resolved
        .into_iter()
        .map(|r| annotate_step(r.rule, r.depends_on))
        .collect();

    info!(
        changed_files = changed_files.len(),
        rules = rules.len(),
        selected = steps.len(),
        "selected pipeline steps"
    );

    Ok(steps)
}
