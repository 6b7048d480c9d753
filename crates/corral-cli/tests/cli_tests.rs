//! Help, version, config and completion surfaces.

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn corral(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("corral");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn no_color_convention_values_do_not_break_parsing() {
    for value in ["1", "true", "yes"] {
        let home = TempDir::new().unwrap();
        corral(&home)
            .env("NO_COLOR", value)
            .args(["config", "get", "tools.command_timeout_secs"])
            .assert()
            .success()
            .stdout(predicate::str::contains("300"));
    }
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_help_shows_generator_flags() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--db-type"))
        .stdout(predicate::str::contains("--skip-webpack"))
        .stdout(predicate::str::contains("--with-dep"));
}

#[test]
fn unknown_flag_exits_with_usage_error() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .args(["new", "coke", "--lang", "go"])
        .assert()
        .code(2);
}

#[test]
fn config_get_reads_file_and_environment() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("corral.toml");
    std::fs::write(&file, "[defaults]\ndb_type = \"mysql\"\n").unwrap();

    corral(&home)
        .args(["config", "get", "defaults.db_type", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::diff("mysql\n"));

    corral(&home)
        .env("CORRAL_TOOLS__GIT", "/opt/git/bin/git")
        .args(["config", "get", "tools.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/opt/git/bin/git"));
}

#[test]
fn config_get_unknown_key_exits_3() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown config key: 'nope.nothing'"));
}

#[test]
fn missing_explicit_config_file_exits_4() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .args(["config", "list", "--config", "does-not-exist.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn init_writes_a_loadable_config() {
    let home = TempDir::new().unwrap();
    corral(&home).arg("init").assert().success();

    corral(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"))
        .stdout(predicate::str::contains("command_timeout_secs = 300"));
}

#[test]
fn completions_use_the_binary_name() {
    let home = TempDir::new().unwrap();
    corral(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corral"));
}
