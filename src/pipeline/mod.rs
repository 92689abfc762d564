// src/pipeline/mod.rs

//! Turning selected steps into an uploaded pipeline.
//!
//! - [`emit`] builds and serializes the YAML document.
//! - [`upload`] builds and runs the `buildkite-agent pipeline upload` call.

pub mod emit;
pub mod upload;

pub use emit::{Pipeline, PipelineEntry, WAIT_MARKER, write_pipeline};
pub use upload::{UploadCommand, upload_pipeline};
