// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::loader::DEFAULT_CONFIG_PATH;

/// Command-line arguments for `monodiff`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "monodiff",
    version,
    about = "Trigger only the pipelines whose watched paths changed.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `monodiff.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Read the configuration from `BUILDKITE_PLUGINS` instead of `--config`.
    #[arg(long)]
    pub from_env: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, the config's `log_level`, then `MONODIFF_LOG`, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the generated pipeline instead of uploading it.
    #[arg(long)]
    pub dry_run: bool,

    /// Where to write the pipeline document.
    ///
    /// If omitted, a temporary file is used and removed after the upload.
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
