use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_task"))
        .arg("--file")
        .arg(dir.join("tasks.json"))
        .args(args)
        .env("TASKS_CONFIG_PATH", dir.join("missing-config.json"))
        .env_remove("TASKS_FILE")
        .env_remove("NOTES_FILE")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run task")
}

#[test]
fn help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_task"))
        .arg("--help")
        .output()
        .expect("failed to run task --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["add", "list", "done", "search", "plan", "reset", "note"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn add_list_done_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let added = run(dir.path(), &["add", "Buy milk", "--title", "Milk"]);
    assert!(added.status.success());
    assert_eq!(
        String::from_utf8_lossy(&added.stdout).trim(),
        "Added task 1: \"Buy milk\""
    );

    let done = run(dir.path(), &["done", "1"]);
    assert!(done.status.success());
    assert_eq!(
        String::from_utf8_lossy(&done.stdout).trim(),
        "Task 1 marked completed."
    );

    let listed = run(dir.path(), &["list", "--json"]);
    assert!(listed.status.success());
    let tasks: serde_json::Value = serde_json::from_slice(&listed.stdout).unwrap();
    assert_eq!(tasks[0]["id"], 1);
    assert_eq!(tasks[0]["title"], "Milk");
    assert_eq!(tasks[0]["completed"], true);
}

#[test]
fn unknown_command_exits_with_invalid_input() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(dir.path(), &["frobnicate"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR: invalid_input - "));
    assert!(!dir.path().join("tasks.json").exists());
}
