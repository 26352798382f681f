use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_displays_usage() {
    Command::cargo_bin("llmcode")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn completions_print_without_entering_the_repl() {
    Command::cargo_bin("llmcode")
        .expect("binary exists")
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("llmcode"));
}
