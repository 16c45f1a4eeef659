//! Integration tests for `fiscode lookup`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the compiled `fiscode` binary.
fn fiscode_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("fiscode");
    path
}

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

fn lookup(municipality: &str, province: &str, extra: &[&str]) -> Output {
    Command::new(fiscode_bin())
        .arg("--municipalities")
        .arg(fixture("comuni.csv"))
        .args(["lookup", "--municipality", municipality, "--province", province])
        .args(extra)
        .output()
        .expect("run fiscode lookup")
}

#[test]
fn lookup_prints_cadastral_code() {
    let out = lookup("Milano", "MI", &[]);
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "F205\n");
}

#[test]
fn lookup_is_case_and_whitespace_insensitive() {
    let out = lookup("  san   giovanni in persiceto ", "bo", &[]);
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "G467");
}

#[test]
fn lookup_accented_name() {
    let out = lookup("Forlì", "FC", &[]);
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "D704");
}

#[test]
fn lookup_json_output() {
    let out = lookup("Torino", "TO", &["--format", "json"]);
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["municipality"], "Torino");
    assert_eq!(value["province"], "TO");
    assert_eq!(value["cadastral_code"], "L219");
}

#[test]
fn lookup_wrong_province_exit_1() {
    let out = lookup("Roma", "MI", &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("municipality not found"), "stderr: {stderr}");
}

#[test]
fn lookup_invalid_province_code_exit_1() {
    let out = lookup("Roma", "R1", &[]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn lookup_without_table_exit_2() {
    let out = Command::new(fiscode_bin())
        .env_remove("FISCODE_MUNICIPALITIES")
        .args(["lookup", "--municipality", "Roma", "--province", "RM"])
        .output()
        .expect("run fiscode lookup");
    assert_eq!(out.status.code(), Some(2));
}
