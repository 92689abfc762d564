// src/pipeline/upload.rs

//! Uploader: hands the generated document to `buildkite-agent`.

use std::path::Path;

use tracing::info;

use crate::errors::{MonodiffError, Result};
use crate::exec::CommandRunner;

/// Executable used to upload pipelines.
pub const AGENT_PROGRAM: &str = "buildkite-agent";

/// Flag appended when the config's `interpolation` toggle is set.
pub const NO_INTERPOLATION_FLAG: &str = "--no-interpolation";

/// Fully built upload invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl UploadCommand {
    /// `buildkite-agent pipeline upload <path> [--no-interpolation]`.
    ///
    /// `interpolation = true` appends `--no-interpolation`. The mapping is
    /// kept exactly as existing pipelines rely on it.
    pub fn new(pipeline_path: &Path, interpolation: bool) -> Self {
        let mut args = vec![
            "pipeline".to_string(),
            "upload".to_string(),
            pipeline_path.display().to_string(),
        ];
        if interpolation {
            args.push(NO_INTERPOLATION_FLAG.to_string());
        }
        Self {
            program: AGENT_PROGRAM.to_string(),
            args,
        }
    }
}

/// Run the upload. A spawn failure or non-zero exit is `UploadFailed`.
pub async fn upload_pipeline(runner: &dyn CommandRunner, command: &UploadCommand) -> Result<()> {
    info!(program = %command.program, args = ?command.args, "uploading pipeline");

    let output = runner
        .run(&command.program, &command.args)
        .await
        .map_err(|e| MonodiffError::UploadFailed(e.to_string()))?;

    if !output.is_success() {
        return Err(MonodiffError::UploadFailed(format!(
            "{} exited with {:?}: {}",
            command.program,
            output.code,
            output.stderr.trim()
        )));
    }

    Ok(())
}
