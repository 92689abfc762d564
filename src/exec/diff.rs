// src/exec/diff.rs

//! Diff source: the list of changed files, from a shell command.

use tracing::{debug, info};

use crate::errors::{MonodiffError, Result};
use crate::exec::backend::{CommandRunner, shell_command};

/// Run the configured diff command and return the changed paths.
///
/// No output is a valid result (nothing changed). Failing to spawn the shell
/// or a non-zero exit is [`MonodiffError::DiffFailed`]; whatever the command
/// printed before failing is discarded.
pub async fn changed_files(runner: &dyn CommandRunner, command: &str) -> Result<Vec<String>> {
    let (program, args) = shell_command(command);
    info!(%command, "running diff command");

    let output = runner
        .run(&program, &args)
        .await
        .map_err(|e| MonodiffError::DiffFailed {
            command: command.to_string(),
            reason: e.to_string(),
        })?;

    if !output.is_success() {
        let code = output
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        return Err(MonodiffError::DiffFailed {
            command: command.to_string(),
            reason: format!("exit status {code}: {}", output.stderr.trim()),
        });
    }

    let files = parse_diff_output(&output.stdout);
    debug!(count = files.len(), ?files, "changed files");
    Ok(files)
}

/// One path per line; surrounding whitespace trimmed, blank lines dropped.
pub fn parse_diff_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
