// tests/config_loading.rs
mod common;
use crate::common::{init_tracing, triggers};

use std::error::Error;
use std::io::Write;

use tempfile::NamedTempFile;

use monodiff::config::{ConfigFile, load_and_validate, load_from_path, load_from_plugins_json};
use monodiff::errors::MonodiffError;
use monodiff::select::select_steps;
use monodiff::types::{CommandSpec, ExitStatus, SoftFail};

type TestResult = Result<(), Box<dyn Error>>;

fn no_env(_: &str) -> Option<String> {
    None
}

const FULL_CONFIG: &str = r#"
diff = "git diff --name-only origin/main...HEAD"
wait = true
interpolation = false
log_level = "debug"
env = ["DEPLOY_ENV=staging"]

[[hooks]]
command = "echo done"

[[watch]]
path = "libs/proto"
key = "proto"
config = { trigger = "proto-pipeline", build = { message = "protos", branch = "main", commit = "abc" } }

[[watch]]
path = ["services/api", "services/shared/**/*.go"]
key = "api"
depends_on = ["proto"]

[watch.config]
trigger = "api-pipeline"
label = "API"
async = true
soft_fail = [{ exit_status = 1 }, { exit_status = "*" }]

[watch.config.build.env]
GOFLAGS = "-mod=vendor"

[[watch]]
path = "docs"
config = { command = ["make docs", "make publish"], agents = { queue = "docs" }, artifacts = ["site/**/*"] }
"#;

#[test]
fn full_toml_config_round_trips_into_rules() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    write!(file, "{FULL_CONFIG}")?;

    let raw = load_from_path(file.path())?;
    let cfg = ConfigFile::from_raw_with_env(raw, &no_env)?;

    assert_eq!(cfg.diff, "git diff --name-only origin/main...HEAD");
    assert!(cfg.wait);
    assert!(!cfg.interpolation);
    assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    assert_eq!(cfg.hook_commands().collect::<Vec<_>>(), vec!["echo done"]);
    assert_eq!(cfg.watch.len(), 3);

    let api = &cfg.watch[1];
    assert_eq!(api.patterns, vec!["services/api", "services/shared/**/*.go"]);
    assert_eq!(api.depends_on, vec!["proto"]);
    assert_eq!(api.step.label.as_deref(), Some("API"));
    assert!(api.step.r#async);
    assert_eq!(
        api.step.soft_fail,
        Some(SoftFail::Rules(vec![
            monodiff::types::SoftFailRule { exit_status: ExitStatus::Code(1) },
            monodiff::types::SoftFailRule { exit_status: ExitStatus::Any("*".to_string()) },
        ]))
    );
    assert_eq!(api.step.build.env.get("GOFLAGS").map(String::as_str), Some("-mod=vendor"));
    assert_eq!(api.step.build.env.get("DEPLOY_ENV").map(String::as_str), Some("staging"));

    let docs = &cfg.watch[2];
    assert_eq!(
        docs.step.command,
        Some(CommandSpec::Multiple(vec!["make docs".to_string(), "make publish".to_string()]))
    );
    assert_eq!(docs.step.agents.get("queue").map(String::as_str), Some("docs"));
    assert!(docs.step.build.is_empty());
    Ok(())
}

#[test]
fn loaded_rules_drive_selection() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "{FULL_CONFIG}")?;

    let cfg = ConfigFile::from_raw_with_env(load_from_path(file.path())?, &no_env)?;
    let steps = select_steps(&["libs/proto/user.proto"], &cfg.watch)?;

    assert_eq!(triggers(&steps), vec!["proto-pipeline", "api-pipeline"]);
    assert_eq!(steps[0].key.as_deref(), Some("proto"));
    assert_eq!(steps[1].depends_on, Some(vec!["proto".to_string()]));
    Ok(())
}

#[test]
fn defaults_apply_to_empty_file() -> TestResult {
    let file = NamedTempFile::new()?;
    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.diff, "git diff --name-only HEAD~1");
    assert!(!cfg.wait);
    assert!(cfg.interpolation);
    assert!(cfg.watch.is_empty());
    Ok(())
}

#[test]
fn duplicate_keys_in_file_return_structured_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[watch]]
path = "a"
key = "same"
config = {{ trigger = "a" }}

[[watch]]
path = "b"
key = "same"
config = {{ trigger = "b" }}
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(MonodiffError::DuplicateKey { key, .. }) => assert_eq!(key, "same"),
        Err(e) => panic!("Expected DuplicateKey error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_is_a_configuration_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[[watch]\npath = ").unwrap();

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, MonodiffError::TomlError(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = load_and_validate("/definitely/not/here/monodiff.toml").unwrap_err();
    assert!(matches!(err, MonodiffError::ConfigError(_)));
}

#[test]
fn plugin_json_supports_env_lists_and_path_lists() -> TestResult {
    let json = r#"[{
        "github.com/monebag/monorepo-diff-buildkite-plugin#v2.5.0": {
            "diff": "echo foo-service",
            "interpolation": false,
            "env": ["env1=env-1", "env3"],
            "watch": [
                {"path": ["services/foo", "services/foo-lib"], "config": {"trigger": "foo", "env": {"X": "1"}}},
                {"path": "ops", "key": "ops", "depends_on": ["foo"], "config": {"command": "make ops"}}
            ]
        }
    }]"#;

    let lookup = |name: &str| match name {
        "env3" => Some("env-3".to_string()),
        "BUILDKITE_COMMIT" => Some("123".to_string()),
        _ => None,
    };

    let cfg = ConfigFile::from_raw_with_env(load_from_plugins_json(json)?, &lookup)?;
    assert!(!cfg.interpolation);
    assert_eq!(cfg.env.get("env3").map(String::as_str), Some("env-3"));

    let foo = &cfg.watch[0].step;
    assert_eq!(cfg.watch[0].patterns.len(), 2);
    assert_eq!(foo.env.get("X").map(String::as_str), Some("1"));
    assert_eq!(foo.build.commit.as_deref(), Some("123"));
    assert_eq!(foo.build.env.get("env1").map(String::as_str), Some("env-1"));

    let ops = &cfg.watch[1];
    assert_eq!(ops.step.command, Some(CommandSpec::Single("make ops".to_string())));
    assert!(ops.step.build.is_empty());
    Ok(())
}
