// src/engine/mod.rs

//! One monodiff run: diff, select, emit, upload.
//!
//! All I/O goes through [`CommandRunner`] and [`FileSystem`], so the whole
//! flow runs against fakes in tests.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::exec::{CommandRunner, changed_files};
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, UploadCommand, upload_pipeline, write_pipeline};
use crate::select::select_steps;

/// Knobs that come from the command line rather than the config.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Render the document but do not write or upload it.
    pub dry_run: bool,
    /// Keep the document at this path. `None` uses a temporary file that is
    /// removed after the upload.
    pub output: Option<PathBuf>,
}

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The diff produced no files; nothing was generated or uploaded.
    NoChanges,
    /// `--dry-run`: the document that would have been uploaded.
    DryRun { document: String, steps: usize },
    /// The document was uploaded with `command`.
    Uploaded { command: UploadCommand, steps: usize },
}

/// Run the full flow for a validated config.
///
/// An empty diff short-circuits before selection. A diff or upload failure
/// is returned as an error and is never reported as `NoChanges`.
pub async fn generate_and_upload(
    cfg: &ConfigFile,
    runner: &dyn CommandRunner,
    fs: &dyn FileSystem,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let files = changed_files(runner, &cfg.diff).await?;
    if files.is_empty() {
        info!("no changes detected; skipping pipeline upload");
        return Ok(RunOutcome::NoChanges);
    }

    let steps = select_steps(&files, &cfg.watch)?;
    let step_count = steps.len();
    let pipeline = Pipeline::new(steps, cfg.wait, &cfg.hooks);

    if options.dry_run {
        return Ok(RunOutcome::DryRun {
            document: pipeline.to_yaml()?,
            steps: step_count,
        });
    }

    let (path, temporary) = match &options.output {
        Some(path) => (path.clone(), false),
        None => (temporary_pipeline_path(), true),
    };

    write_pipeline(fs, &path, &pipeline)?;

    let command = UploadCommand::new(&path, cfg.interpolation);
    let uploaded = upload_pipeline(runner, &command).await;

    if temporary {
        cleanup(fs, &path);
    }
    uploaded?;

    info!(steps = step_count, "pipeline uploaded");
    Ok(RunOutcome::Uploaded {
        command,
        steps: step_count,
    })
}

fn temporary_pipeline_path() -> PathBuf {
    std::env::temp_dir().join(format!("monodiff-pipeline-{}.yml", std::process::id()))
}

fn cleanup(fs: &dyn FileSystem, path: &Path) {
    if let Err(err) = fs.remove_file(path) {
        warn!(path = %path.display(), error = %err, "failed to remove temporary pipeline file");
    }
}
