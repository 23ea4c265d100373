use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn conveyor() -> Command {
    Command::cargo_bin("conveyor").expect("conveyor binary")
}

fn setup_root() -> TempDir {
    let root = TempDir::new().expect("root");
    fs::create_dir_all(root.path().join("src")).expect("mkdir src");
    root
}

fn status_json(root: &TempDir) -> serde_json::Value {
    let output = conveyor()
        .arg("status")
        .arg("--root")
        .arg(root.path())
        .arg("--json")
        .output()
        .expect("run status");
    assert!(
        output.status.success(),
        "status failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid status JSON")
}

#[test]
fn status_json_tracks_new_then_current() {
    let root = setup_root();
    fs::write(root.path().join("src/a.txt"), "hello").unwrap();

    let before = status_json(&root);
    assert_eq!(before["summary"]["sources"], 1);
    assert_eq!(before["summary"]["pending"], 1);
    assert_eq!(before["entries"][0]["state"], "new");
    assert!(before["summary"]["last_synced"].is_null());

    conveyor()
        .arg("sync")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success();

    let after = status_json(&root);
    assert_eq!(after["summary"]["pending"], 0);
    assert_eq!(after["entries"][0]["state"], "current");
    assert!(after["summary"]["last_synced"].is_string());
}

#[test]
fn status_json_reports_modified_and_orphan() {
    let root = setup_root();
    fs::write(root.path().join("src/a.txt"), "hello").unwrap();
    conveyor()
        .arg("sync")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success();

    fs::write(root.path().join("src/a.txt"), "hello!").unwrap();
    fs::write(root.path().join("dist/stray.txt"), "x").unwrap();

    let report = status_json(&root);
    let states: Vec<&str> = report["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["state"].as_str().unwrap())
        .collect();
    assert!(states.contains(&"modified"));
    assert!(states.contains(&"orphan"));
}

#[test]
fn status_table_renders_for_humans() {
    let root = setup_root();
    fs::write(root.path().join("src/a.txt"), "hello").unwrap();

    conveyor()
        .arg("status")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sources"))
        .stdout(predicate::str::contains("NEW"))
        .stdout(predicate::str::contains("conveyor sync"));
}

#[test]
fn diff_shows_pending_edit_as_unified_hunks() {
    let root = setup_root();
    fs::write(root.path().join("src/a.txt"), "line1\nline2\n").unwrap();
    conveyor()
        .arg("sync")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success();

    conveyor()
        .arg("diff")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending changes."));

    fs::write(root.path().join("src/a.txt"), "line1\nedited\n").unwrap();
    conveyor()
        .arg("diff")
        .arg("--root")
        .arg(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("--- a/src/a.txt"))
        .stdout(predicate::str::contains("+edited"));
}
