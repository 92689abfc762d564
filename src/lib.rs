// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod select;
pub mod types;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::engine::{RunOptions, RunOutcome, generate_and_upload};
use crate::exec::RealCommandRunner;
use crate::fs::RealFileSystem;

pub use crate::errors::MonodiffError;
pub use crate::select::{WatchRule, select_steps};
pub use crate::types::Step;

/// Load the configuration named by the CLI arguments.
///
/// `--from-env` reads `BUILDKITE_PLUGINS`; otherwise `--config` is used.
pub fn load_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    if args.from_env {
        config::load_from_env()
    } else {
        config::load_and_validate(&args.config)
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the diff command (real processes)
/// - step selection
/// - pipeline emission to disk
/// - the upload (or a dry-run print)
pub async fn run(args: CliArgs, cfg: ConfigFile) -> Result<()> {
    let options = RunOptions {
        dry_run: args.dry_run,
        output: args.output.as_ref().map(PathBuf::from),
    };

    debug!(
        watch_entries = cfg.watch.len(),
        hooks = cfg.hooks.len(),
        wait = cfg.wait,
        "configuration loaded"
    );

    let outcome = generate_and_upload(&cfg, &RealCommandRunner, &RealFileSystem, &options).await?;

    match outcome {
        RunOutcome::NoChanges => {}
        RunOutcome::DryRun { document, steps } => {
            info!(steps, "dry-run; pipeline not uploaded");
            print!("{document}");
        }
        RunOutcome::Uploaded { command, steps } => {
            info!(steps, program = %command.program, "done");
        }
    }

    Ok(())
}
