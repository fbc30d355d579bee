//! Tests that drive the `tripforge-migrate` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(work_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tripforge-migrate"))
        .current_dir(work_dir)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_list_ignores_broken_schema_document() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("schema.json"), "{ not json").unwrap();

    let output = run(
        temp_dir.path(),
        &["--schema", "schema.json", "--output-dir", "scripts", "list"],
    );
    assert!(output.status.success(), "{output:?}");

    let output = run(
        temp_dir.path(),
        &["--schema", "schema.json", "--output-dir", "scripts", "print"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_generate_rejects_path_like_name() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(
        temp_dir.path(),
        &["--output-dir", "scripts", "generate", "--name", "../escaped"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid script name"));
    assert!(!temp_dir.path().join("scripts").exists());
}

#[test]
fn test_generate_then_verify() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(temp_dir.path(), &["--output-dir", "scripts", "generate"]);
    assert!(output.status.success(), "{output:?}");

    let output = run(temp_dir.path(), &["--output-dir", "scripts", "verify"]);
    assert!(output.status.success(), "{output:?}");
}
