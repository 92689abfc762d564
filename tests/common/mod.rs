#![allow(dead_code)]

pub use monodiff_test_utils::{builders, fake_runner, init_tracing, with_timeout};

use monodiff::types::Step;

/// Trigger names of the selected steps, in order.
pub fn triggers(steps: &[Step]) -> Vec<String> {
    steps
        .iter()
        .map(|s| s.trigger.clone().unwrap_or_default())
        .collect()
}
