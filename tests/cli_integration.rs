//! Integration tests for the `fo` CLI.
//!
//! Each test creates a temp data directory, runs `fo` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `fo` binary.
fn fo_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("fo");
    path
}

fn fo(root: &Path, args: &[&str]) -> std::process::Output {
    Command::new(fo_bin())
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run fo")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn init_with_project(root: &Path, title: &str) {
    let out = fo(root, &["init"]);
    assert!(out.status.success(), "init failed: {out:?}");
    let out = fo(root, &["new", title, "--target", "1000"]);
    assert!(out.status.success(), "new failed: {out:?}");
}

#[test]
fn init_creates_data_dir_with_blob_and_settings() {
    let tmp = TempDir::new().unwrap();
    let out = fo(tmp.path(), &["init"]);
    assert!(out.status.success());
    assert!(tmp.path().join("folio/folio.dat").exists());
    assert!(tmp.path().join("folio/settings.toml").exists());
}

#[test]
fn init_refuses_to_clobber_without_force() {
    let tmp = TempDir::new().unwrap();
    assert!(fo(tmp.path(), &["init"]).status.success());
    let second = fo(tmp.path(), &["init"]);
    assert!(!second.status.success());
    let forced = fo(tmp.path(), &["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn new_then_projects_lists_the_project() {
    let tmp = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");

    let out = fo(tmp.path(), &["projects"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Winter Novel"));
    assert!(stdout(&out).contains("0 words"));
}

#[test]
fn projects_json_output_is_parseable() {
    let tmp = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");

    let out = fo(tmp.path(), &["--json", "projects"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(parsed[0]["title"], "Winter Novel");
    assert_eq!(parsed[0]["target_word_count"], 1000);
}

#[test]
fn stats_reports_target_progress() {
    let tmp = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");

    let out = fo(tmp.path(), &["stats", "Winter Novel"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("chapter words: 0"));
    assert!(text.contains("target: 1000"));
}

#[test]
fn backup_and_restore_round_trip() {
    let tmp = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");

    let out = fo(
        tmp.path(),
        &["backup", "--out", backups.path().to_str().unwrap()],
    );
    assert!(out.status.success());

    let backup_file = fs::read_dir(backups.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    assert!(
        backup_file
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("Folio_Backup_")
    );

    // A fresh installation restored from the backup sees the project
    let fresh = TempDir::new().unwrap();
    assert!(fo(fresh.path(), &["init"]).status.success());
    let out = fo(
        fresh.path(),
        &["restore", backup_file.to_str().unwrap()],
    );
    assert!(out.status.success(), "restore failed: {out:?}");

    let out = fo(fresh.path(), &["projects"]);
    assert!(stdout(&out).contains("Winter Novel"));
}

#[test]
fn add_mkdir_and_tree_show_structure() {
    let tmp = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");

    assert!(fo(tmp.path(), &["mkdir", "Winter Novel", "Part I"]).status.success());
    assert!(
        fo(
            tmp.path(),
            &["add", "Winter Novel", "Chapter 1", "--folder", "Part I"]
        )
        .status
        .success()
    );
    assert!(
        fo(
            tmp.path(),
            &["add", "Winter Novel", "Premise", "--kind", "Synopsis"]
        )
        .status
        .success()
    );

    let out = fo(tmp.path(), &["tree", "Winter Novel"]);
    assert!(out.status.success());
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].contains("Part I/"));
    assert!(lines[1].starts_with("  ") && lines[1].contains("Chapter 1"));
    assert!(lines[2].contains("Premise"));
}

#[test]
fn unknown_kind_is_rejected() {
    let tmp = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");
    let out = fo(tmp.path(), &["add", "Winter Novel", "Doc", "--kind", "Poem"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown document kind"));
}

#[test]
fn export_compiles_enabled_documents() {
    let tmp = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    init_with_project(tmp.path(), "Winter Novel");
    assert!(fo(tmp.path(), &["add", "Winter Novel", "Chapter 1"]).status.success());

    let out = fo(
        tmp.path(),
        &["export", "Winter Novel", "--out", out_dir.path().to_str().unwrap()],
    );
    assert!(out.status.success(), "export failed: {out:?}");

    let draft = fs::read_to_string(out_dir.path().join("winter_novel_full_draft.md")).unwrap();
    assert!(draft.starts_with("# Winter Novel"));
    assert!(draft.contains("# Chapter 1"));
}

#[test]
fn config_set_then_get() {
    let tmp = TempDir::new().unwrap();
    assert!(fo(tmp.path(), &["init"]).status.success());

    let out = fo(tmp.path(), &["config", "highlight_color", "#ff0000"]);
    assert!(out.status.success());

    let out = fo(tmp.path(), &["config", "highlight_color"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("#ff0000"));

    // The write went through the comment-preserving path into settings.toml
    let text = fs::read_to_string(tmp.path().join("folio/settings.toml")).unwrap();
    assert!(text.contains("highlight_color = \"#ff0000\""));
}

#[test]
fn unknown_project_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(fo(tmp.path(), &["init"]).status.success());
    let out = fo(tmp.path(), &["tree", "Nope"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no project matching"));
}
