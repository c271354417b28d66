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
        .output()
        .expect("failed to run done command")
}

fn seed(dir: &Path) {
    std::fs::write(
        dir.join("tasks.json"),
        r#"[
  {"id": 1, "description": "Buy milk", "completed": false},
  {"id": 2, "description": "Call mom", "completed": true}
]"#,
    )
    .unwrap();
}

#[test]
fn done_marks_task_completed() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let output = run(dir.path(), &["done", "1"]);

    assert!(output.status.success());
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("tasks.json")).unwrap())
            .unwrap();
    assert_eq!(stored[0]["completed"], true);
    assert!(stored[0]["completed_at"].is_string());
    assert_eq!(stored[1]["completed"], true);
}

#[test]
fn complete_alias_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let output = run(dir.path(), &["complete", "1", "--json"]);

    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["id"], 1);
    assert_eq!(task["completed"], true);
}

#[test]
fn done_on_completed_task_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let before = std::fs::read(dir.path().join("tasks.json")).unwrap();

    let output = run(dir.path(), &["done", "2"]);

    assert!(output.status.success());
    assert_eq!(std::fs::read(dir.path().join("tasks.json")).unwrap(), before);
}

#[test]
fn done_unknown_id_exits_not_found() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let before = std::fs::read(dir.path().join("tasks.json")).unwrap();

    let output = run(dir.path(), &["done", "99"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR: not_found - "));
    assert!(stderr.contains("99"));
    assert_eq!(std::fs::read(dir.path().join("tasks.json")).unwrap(), before);
}

#[test]
fn done_rejects_non_numeric_id() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    for bad in ["abc", "0", "-3"] {
        let output = run(dir.path(), &["done", "--", bad]);
        assert_eq!(output.status.code(), Some(1), "id {bad}");
    }
}

#[test]
fn done_on_malformed_store_exits_storage() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "not json").unwrap();

    let output = run(dir.path(), &["done", "1"]);

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("tasks.json")).unwrap(),
        "not json"
    );
}
