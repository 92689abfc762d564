// src/pipeline/emit.rs

//! Pipeline emitter: selected steps to a YAML pipeline document.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::model::HookConfig;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::Step;

/// Literal marker for a Buildkite `wait` step.
pub const WAIT_MARKER: &str = "wait";

/// The uploaded document: `steps: [...]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    pub steps: Vec<PipelineEntry>,
}

/// One entry in `steps`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineEntry {
    Step(Step),
    /// Bare string entry, used for `- wait`.
    Marker(String),
    /// `- command: ...` hook entry.
    Command { command: String },
}

impl Pipeline {
    /// Selected steps, then `wait` if requested, then one command per hook.
    pub fn new(steps: Vec<Step>, wait: bool, hooks: &[HookConfig]) -> Self {
        let mut entries: Vec<PipelineEntry> = steps.into_iter().map(PipelineEntry::Step).collect();

        if wait {
            entries.push(PipelineEntry::Marker(WAIT_MARKER.to_string()));
        }

        entries.extend(hooks.iter().map(|hook| PipelineEntry::Command {
            command: hook.command.clone(),
        }));

        Self { steps: entries }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Render the pipeline and write it to `path`.
pub fn write_pipeline(fs: &dyn FileSystem, path: &Path, pipeline: &Pipeline) -> Result<String> {
    let document = pipeline.to_yaml()?;
    fs.write(path, document.as_bytes())?;
    debug!(path = %path.display(), entries = pipeline.steps.len(), "wrote pipeline document");
    Ok(document)
}
