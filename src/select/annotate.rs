// src/select/annotate.rs

use crate::select::rule::WatchRule;
use crate::types::Step;

/// Produce the emitted step for a triggered rule.
///
/// Works on a clone of the template. The rule's key wins when it is
/// non-empty; otherwise a key already set on the template is kept.
/// `depends_on` is replaced wholesale with the filtered list.
pub fn annotate_step(rule: &WatchRule, depends_on: Option<Vec<String>>) -> Step {
    let mut step = rule.step.clone();
    if let Some(key) = rule.key() {
        step.key = Some(key.to_string());
    }
    step.depends_on = depends_on;
    step
}
