use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_task"))
        .arg("--file")
        .arg(dir.join("tasks.json"))
        .args(args)
        .env("TASKS_CONFIG_PATH", dir.join("missing-config.json"))
        .env_remove("TASKS_FILE")
        .env_remove("NOTES_FILE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn reset command");

    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait on reset")
}

fn seed(dir: &Path) {
    std::fs::write(
        dir.join("tasks.json"),
        r#"[{"id": 1, "description": "Buy milk", "completed": false}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("notes.json"),
        r#"[{"id": 1, "title": "Lecture", "content": "AI"}]"#,
    )
    .unwrap();
}

#[test]
fn reset_with_yes_clears_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let output = run_with_input(dir.path(), &["reset", "--yes"], "");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Removed 1 tasks and 1 notes."
    );
    for file in ["tasks.json", "notes.json"] {
        let stored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(file)).unwrap())
                .unwrap();
        assert_eq!(stored, serde_json::json!([]));
    }
}

#[test]
fn reset_confirmed_interactively() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let output = run_with_input(dir.path(), &["reset", "--json"], "y\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let last_line = stdout.lines().last().unwrap();
    let json_start = last_line.find('{').unwrap();
    let summary: serde_json::Value = serde_json::from_str(&last_line[json_start..]).unwrap();
    assert_eq!(summary["tasks_removed"], 1);
    assert_eq!(summary["notes_removed"], 1);
}

#[test]
fn reset_declined_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let before = std::fs::read(dir.path().join("tasks.json")).unwrap();

    let output = run_with_input(dir.path(), &["reset"], "n\n");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Reset canceled."));
    assert_eq!(std::fs::read(dir.path().join("tasks.json")).unwrap(), before);
}
