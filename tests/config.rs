use no_capture::LintEngine;
use no_capture::config;
use no_capture::level::LintLevel;
use no_capture::lint::{LintRegistry, LintSettings};
use std::path::{Path, PathBuf};

const CAPTURING: &str = include_str!("fixtures/no_capture/marked_parameter.cs");

fn fixture_config(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/config")
        .join(name)
        .join(config::DEFAULT_CONFIG_FILE_NAME)
}

fn engine_for(cfg: &config::NoCaptureConfig) -> LintEngine {
    let empty: Vec<String> = Vec::new();
    let registry = LintRegistry::default_rules_filtered(&empty, &empty, &cfg.lints.disabled)
        .expect("registry");
    LintEngine::new_with_settings(registry, LintSettings::from_config(cfg))
}

#[test]
fn config_can_demote_lint_to_warning() {
    let cfg = config::load_config_file(&fixture_config("warn_level")).expect("config should load");
    let engine = engine_for(&cfg);

    let diags = engine.lint_source(CAPTURING).expect("linting should succeed");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].level, LintLevel::Warn);
}

#[test]
fn config_can_disable_lint() {
    let cfg = config::load_config_file(&fixture_config("disabled")).expect("config should load");
    let engine = engine_for(&cfg);

    assert_eq!(engine.registry().descriptors().count(), 0);
    let diags = engine.lint_source(CAPTURING).expect("linting should succeed");
    assert!(diags.is_empty());
}

#[test]
fn disabled_lint_is_silent_even_when_registered() {
    let cfg = config::load_config_file(&fixture_config("disabled")).expect("config should load");
    let engine = LintEngine::new_with_settings(
        LintRegistry::default_rules(),
        LintSettings::from_config(&cfg),
    );

    let diags = engine.lint_source(CAPTURING).expect("linting should succeed");
    assert!(diags.is_empty());
}

#[test]
fn config_marker_names_replace_the_default() {
    let cfg = config::load_config_file(&fixture_config("hot_path")).expect("config should load");
    let engine = engine_for(&cfg);

    let diags = engine.lint_source(CAPTURING).expect("linting should succeed");
    assert!(diags.is_empty(), "NoCapture is no longer a marker: {diags:#?}");

    let src = r#"
using System;

class C
{
    private int _field;

    void CallSite() => Invoke(() => _field);
    [HotPath] T Invoke<T>(Func<T> func) => func();
}
"#;
    let diags = engine.lint_source(src).expect("linting should succeed");
    assert_eq!(diags.len(), 1);
}

#[test]
fn config_can_include_generated_sources() {
    let generated = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/generated/Callbacks.g.cs");

    let default_engine = no_capture::create_default_engine();
    let diags = default_engine.lint_file(&generated).expect("linting should succeed");
    assert!(diags.is_empty());

    let settings = LintSettings::default().with_include_generated(true);
    let engine = LintEngine::new_with_settings(LintRegistry::default_rules(), settings);
    let diags = engine.lint_file(&generated).expect("linting should succeed");
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].message,
        "Register( callback ) requires a non-capturing lambda. Captured variables: this."
    );
    assert_eq!(diags[0].file.as_deref(), Some(generated.display().to_string().as_str()));
}

#[test]
fn unknown_disabled_lint_is_rejected() {
    let cfg =
        config::load_config_file(&fixture_config("unknown_lint")).expect("config should load");
    let empty: Vec<String> = Vec::new();

    let err = LintRegistry::default_rules_filtered(&empty, &empty, &cfg.lints.disabled)
        .err()
        .expect("unknown lint should be rejected");
    assert_eq!(err.to_string(), "unknown lint: no_such_lint");
}

#[test]
fn config_file_is_found_in_an_ancestor_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("src").join("Hot");
    std::fs::create_dir_all(&nested).expect("create nested dirs");
    let cfg_path = dir.path().join(config::DEFAULT_CONFIG_FILE_NAME);
    std::fs::write(&cfg_path, "[lints]\nno_capture = \"warn\"\n").expect("write config");

    assert_eq!(config::find_config_file(&nested), Some(cfg_path.clone()));

    let (found, cfg) = config::load_config(None, &nested)
        .expect("config should load")
        .expect("config should be found");
    assert_eq!(found, cfg_path);
    assert_eq!(cfg.lints.levels.get("no_capture"), Some(&LintLevel::Warn));
}

#[test]
fn explicit_config_path_wins_over_discovery() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(config::DEFAULT_CONFIG_FILE_NAME),
        "[lints]\nno_capture = \"warn\"\n",
    )
    .expect("write config");
    let explicit = dir.path().join("strict.toml");
    std::fs::write(&explicit, "[lints]\nno_capture = \"error\"\n").expect("write config");

    let (found, cfg) = config::load_config(Some(&explicit), dir.path())
        .expect("config should load")
        .expect("explicit config");
    assert_eq!(found, explicit);
    assert_eq!(cfg.lints.levels.get("no_capture"), Some(&LintLevel::Error));
}

#[test]
fn malformed_config_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(config::DEFAULT_CONFIG_FILE_NAME);
    std::fs::write(&path, "[lints]\nno_capture = \"loud\"\n").expect("write config");

    let err = config::load_config_file(&path).expect_err("invalid level");
    assert!(format!("{err:#}").contains("failed to parse config file"));
}
