//! Integration tests for the `stencil` binary.

use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// `stencil` with shipped templates and a config home that cannot leak in
/// from the developer's machine.
fn stencil(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("stencil");
    cmd.env("STENCIL_TEMPLATES_DIR", templates_dir())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_mentions_subcommands() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("emit"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[cfg(unix)]
#[test]
fn new_browniexmix_marks_console_executable() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    stencil(home.path())
        .current_dir(work.path())
        .args(["new", "browniexmix", "console-app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chmod u+x console.sh"));

    let console = work.path().join("console-app/console.sh");
    let mode = std::fs::metadata(&console).unwrap().permissions().mode();
    assert_ne!(mode & 0o100, 0);
    assert!(work.path().join("console-app/scripts/contract_loader.py").is_file());
}

#[test]
fn new_webpack_with_answers_and_defaults() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dest = work.path().join("ts-app");

    stencil(home.path())
        .args(["new", "webpack-babel-ts"])
        .arg(&dest)
        .args(["-a", "name=Ada", "--yes"])
        .assert()
        .success();

    let index = std::fs::read_to_string(dest.join("src/index.ts")).unwrap();
    assert!(index.starts_with("// Generated for Ada (would rather not say) in "));
    assert!(dest.join("webpack.config.js").is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dest = work.path().join("preview");

    stencil(home.path())
        .args(["new", "webpack-babel-ts"])
        .arg(&dest)
        .args(["--yes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/index.ts"));

    assert!(!dest.exists());
}

#[test]
fn list_json_names_both_templates() {
    let home = TempDir::new().unwrap();
    let out = stencil(home.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, ["browniexmix", "webpack-babel-ts"]);
}

#[test]
fn list_plain_names() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("browniexmix\n"));
}

#[cfg(unix)]
#[test]
fn emit_on_existing_project() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let console = dest.path().join("console.sh");
    std::fs::write(&console, "#!/bin/sh\nbrownie console\n").unwrap();
    std::fs::set_permissions(&console, std::fs::Permissions::from_mode(0o644)).unwrap();

    stencil(home.path())
        .arg("emit")
        .arg(dest.path())
        .assert()
        .success();

    let mode = std::fs::metadata(&console).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o744);
}

#[cfg(unix)]
#[test]
fn emit_reads_context_from_stdin() {
    let home = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    std::fs::write(dest.path().join("run.sh"), "#!/bin/sh\n").unwrap();

    let ctx = serde_json::json!({ "dest": dest.path(), "answers": {} }).to_string();

    stencil(home.path())
        .args(["emit", "--context", "-", "--path", "run.sh"])
        .write_stdin(ctx)
        .assert()
        .success();
}

#[test]
fn config_get_reports_default_timeout() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .args(["config", "get", "hooks.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("30\n"));
}

#[test]
fn config_env_override() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .env("STENCIL_HOOKS__TIMEOUT_SECS", "5")
        .args(["config", "get", "hooks.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn init_writes_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("stencil.toml");

    stencil(home.path())
        .arg("-c")
        .arg(&path)
        .arg("init")
        .assert()
        .success();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("timeout_secs = 30"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    stencil(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stencil"));
}
