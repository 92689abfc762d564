// tests/select_steps.rs
mod common;
use crate::common::builders::WatchRuleBuilder;
use crate::common::{init_tracing, triggers};

use std::error::Error;

use monodiff::select::select_steps;
use monodiff::types::{Build, Step};

type TestResult = Result<(), Box<dyn Error>>;

fn keyed(key: &str, trigger: &str, path: &str) -> WatchRuleBuilder {
    WatchRuleBuilder::new(trigger).key(key).path(path)
}

fn expected(trigger: &str, key: Option<&str>, depends_on: &[&str]) -> Step {
    Step {
        trigger: Some(trigger.to_string()),
        key: key.map(str::to_string),
        depends_on: if depends_on.is_empty() {
            None
        } else {
            Some(depends_on.iter().map(|s| s.to_string()).collect())
        },
        ..Step::default()
    }
}

#[test]
fn selects_only_matching_rules_in_declared_order() -> TestResult {
    init_tracing();

    let rules = vec![
        WatchRuleBuilder::new("svc-1").path("watch-1").key("").build(),
        WatchRuleBuilder::new("svc-2").path("watch-2/").build(),
        WatchRuleBuilder::new("svc-3").path("watch-5").build(),
        WatchRuleBuilder::new("svc-4").path("watch-2").build(),
    ];
    let changed = [
        "watch-1/x.txt",
        "watch-2/.gitignore",
        "watch-2/src/i.go",
        "watch-4/t/i_test.go",
    ];

    let steps = select_steps(&changed, &rules)?;
    assert_eq!(triggers(&steps), vec!["svc-1", "svc-2", "svc-4"]);
    Ok(())
}

#[test]
fn rule_with_several_paths_triggers_once() -> TestResult {
    let rules = vec![
        WatchRuleBuilder::new("service-1").path("watch-path-1").build(),
        WatchRuleBuilder::new("service-2")
            .path("watch-path-2/")
            .path("watch-path-3/")
            .path("watch-path-4")
            .build(),
        WatchRuleBuilder::new("service-3").path("watch-path-5").build(),
        WatchRuleBuilder::new("service-4").path("watch-path-2").build(),
    ];
    let changed = [
        "watch-path-1/text.txt",
        "watch-path-2/.gitignore",
        "watch-path-2/src/index.go",
        "watch-path-4/test/index_test.go",
    ];

    let steps = select_steps(&changed, &rules)?;
    assert_eq!(triggers(&steps), vec!["service-1", "service-2", "service-4"]);
    Ok(())
}

#[test]
fn wildcard_patterns() -> TestResult {
    let cases: Vec<(&str, Vec<&str>, bool)> = vec![
        ("*.txt", vec!["text.txt", ".gitignore"], true),
        ("docs/*.txt", vec!["docs/text.txt"], true),
        ("**/text.txt", vec!["docs/text.txt"], true),
        ("*/*.txt", vec!["package/other.txt"], true),
        ("**/*.txt", vec!["package/docs/other.txt"], true),
        ("*/*.txt", vec!["package/docs/other.txt"], false),
        ("*.txt", vec!["docs/text.txt"], false),
    ];

    for (pattern, changed, should_trigger) in cases {
        let rules = vec![WatchRuleBuilder::new("txt").path(pattern).build()];
        let steps = select_steps(&changed, &rules)?;
        let want = if should_trigger { vec![Step::trigger("txt")] } else { vec![] };
        assert_eq!(steps, want, "pattern {pattern} against {changed:?}");
    }
    Ok(())
}

#[test]
fn sets_step_key_from_rule() -> TestResult {
    let rules = vec![keyed("service-a", "service-a-trigger", "service-a.txt").build()];
    let steps = select_steps(&["service-a.txt"], &rules)?;
    assert_eq!(steps, vec![expected("service-a-trigger", Some("service-a"), &[])]);
    Ok(())
}

#[test]
fn lets_existing_template_key_be() -> TestResult {
    let rules = vec![
        WatchRuleBuilder::new("service-a-trigger")
            .path("service-a.txt")
            .step_key("existing-key")
            .build(),
    ];
    let steps = select_steps(&["service-a.txt"], &rules)?;
    assert_eq!(steps, vec![expected("service-a-trigger", Some("existing-key"), &[])]);
    Ok(())
}

#[test]
fn dependent_of_triggered_step_is_triggered() -> TestResult {
    let rules = vec![
        keyed("service-a-key", "step-a-trigger", "service-a.txt").build(),
        keyed("service-b-key", "step-b-trigger", "service-b.txt")
            .depends_on("service-a-key")
            .build(),
    ];

    let steps = select_steps(&["service-a.txt"], &rules)?;
    assert_eq!(
        steps,
        vec![
            expected("step-a-trigger", Some("service-a-key"), &[]),
            expected("step-b-trigger", Some("service-b-key"), &["service-a-key"]),
        ]
    );
    Ok(())
}

#[test]
fn dependencies_dependency_triggers_whole_chain() -> TestResult {
    let rules = vec![
        keyed("service-a-key", "step-a-trigger", "service-a.txt").build(),
        keyed("service-b-key", "step-b-trigger", "service-b.txt")
            .depends_on("service-a-key")
            .build(),
        keyed("service-c-key", "step-c-trigger", "service-c.txt")
            .depends_on("service-b-key")
            .build(),
    ];

    let steps = select_steps(&["service-a.txt"], &rules)?;
    assert_eq!(
        steps,
        vec![
            expected("step-a-trigger", Some("service-a-key"), &[]),
            expected("step-b-trigger", Some("service-b-key"), &["service-a-key"]),
            expected("step-c-trigger", Some("service-c-key"), &["service-b-key"]),
        ]
    );
    Ok(())
}

#[test]
fn untriggered_dependency_is_omitted_not_empty() -> TestResult {
    let rules = vec![
        keyed("service-a-key", "step-a-trigger", "service-a.txt").build(),
        keyed("service-b-key", "step-b-trigger", "service-b.txt")
            .depends_on("service-a-key")
            .build(),
    ];

    let steps = select_steps(&["service-b.txt"], &rules)?;
    assert_eq!(steps, vec![expected("step-b-trigger", Some("service-b-key"), &[])]);
    assert!(steps[0].depends_on.is_none());
    Ok(())
}

#[test]
fn only_triggered_dependencies_are_kept() -> TestResult {
    let rules = vec![
        keyed("service-a-key", "step-a-trigger", "service-a.txt").build(),
        keyed("service-b-key", "step-b-trigger", "service-b.txt").build(),
        keyed("service-c-key", "step-c-trigger", "service-c.txt")
            .depends_on("service-a-key")
            .depends_on("service-b-key")
            .build(),
    ];

    let steps = select_steps(&["service-a.txt"], &rules)?;
    assert_eq!(
        steps,
        vec![
            expected("step-a-trigger", Some("service-a-key"), &[]),
            expected("step-c-trigger", Some("service-c-key"), &["service-a-key"]),
        ]
    );
    Ok(())
}

#[test]
fn independently_triggered_siblings_keep_dependency() -> TestResult {
    let rules = vec![
        keyed("service-a-key", "step-a-trigger", "service-a.txt").build(),
        keyed("service-b-key", "step-b-trigger", "service-b.txt")
            .depends_on("service-a-key")
            .build(),
    ];

    let steps = select_steps(&["service-a.txt", "service-b.txt"], &rules)?;
    assert_eq!(
        steps,
        vec![
            expected("step-a-trigger", Some("service-a-key"), &[]),
            expected("step-b-trigger", Some("service-b-key"), &["service-a-key"]),
        ]
    );
    Ok(())
}

#[test]
fn no_changed_files_selects_nothing() -> TestResult {
    let rules = vec![keyed("a", "a", "a").build(), keyed("b", "b", "**/*").depends_on("a").build()];
    let steps = select_steps::<&str>(&[], &rules)?;
    assert!(steps.is_empty());
    Ok(())
}

#[test]
fn build_metadata_passes_through_untouched() -> TestResult {
    let template = Step {
        build: Build {
            message: Some("build message".to_string()),
            ..Build::default()
        },
        label: Some("Foo".to_string()),
        ..Step::trigger("foo-service-pipeline")
    };
    let rules = vec![
        WatchRuleBuilder::new("unused")
            .path("services/foo")
            .step(template.clone())
            .build(),
    ];

    let steps = select_steps(&["services/foo/serverless.yml"], &rules)?;
    assert_eq!(steps, vec![template]);
    Ok(())
}

#[test]
fn duplicate_changed_files_are_harmless() -> TestResult {
    let rules = vec![WatchRuleBuilder::new("svc").path("svc").build()];
    let steps = select_steps(&["svc/a", "svc/a", "svc/a"], &rules)?;
    assert_eq!(steps.len(), 1);
    Ok(())
}

#[test]
fn bracketed_directory_names_select_their_rule() -> TestResult {
    let rules = vec![
        WatchRuleBuilder::new("web").path("pages/[id]").build(),
        WatchRuleBuilder::new("app").path("app/{a,b}").build(),
        WatchRuleBuilder::new("other").path("pages/i").build(),
    ];
    let steps = select_steps(&["pages/[id]/index.tsx", "app/{a,b}/x.ts"], &rules)?;
    assert_eq!(triggers(&steps), vec!["web", "app"]);
    Ok(())
}
