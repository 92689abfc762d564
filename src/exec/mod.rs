// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait and the tokio-backed
//!   `RealCommandRunner`; tests replace it with a fake.
//! - [`diff`] runs the configured diff command and parses its output.

pub mod backend;
pub mod diff;

pub use backend::{CommandOutput, CommandRunner, RealCommandRunner, shell_command};
pub use diff::{changed_files, parse_diff_output};
