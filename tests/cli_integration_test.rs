//! CLI integration tests: run the stubsrv binary to cover main.rs branches.
//! Uses CARGO_BIN_EXE_stubsrv when set (e.g. by `cargo test`).

mod common;

use common::fixtures::{BROKEN_REGEX_MAPPING, DELETE_MAPPING, USERS_MAPPING, mapping_dir};
use std::process::Command;

fn bin() -> Option<std::path::PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_stubsrv").map(std::path::PathBuf::from)
}

#[test]
fn test_cli_help_succeeds() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(bin)
        .arg("--help")
        .output()
        .expect("run --help");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("stubsrv"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_cli_check_valid_directory() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = mapping_dir(&[("users.json", USERS_MAPPING), ("delete.json", DELETE_MAPPING)]);
    let out = Command::new(&bin)
        .arg("check")
        .arg(dir.path())
        .output()
        .expect("run check");
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Checking 2 mapping(s)"));
    assert!(stdout.contains("All mappings valid."));
}

#[test]
fn test_cli_check_reports_invalid_mapping() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let dir = mapping_dir(&[("broken.json", BROKEN_REGEX_MAPPING)]);
    let out = Command::new(&bin)
        .arg("check")
        .arg(dir.path())
        .output()
        .expect("run check on broken mapping");
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ERROR"));
}

#[test]
fn test_cli_check_missing_path_fails() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(&bin)
        .args(["check", "nonexistent_mappings_12345"])
        .output()
        .expect("run check with missing path");
    assert!(!out.status.success(), "expected failure when path missing");
}

#[test]
fn test_cli_call_rejects_unknown_method() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let out = Command::new(&bin)
        .args(["call", "BREW", "http://127.0.0.1:1/coffee"])
        .output()
        .expect("run call");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Unknown method"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_call_prints_selected_fields() {
    let Some(bin) = bin() else {
        eprintln!("Skipping CLI test: CARGO_BIN_EXE not set");
        return;
    };
    let server = common::fixtures::start_reqres_server().await;
    let url = server.url("/api/unknown/2");

    let out = tokio::task::spawn_blocking(move || {
        Command::new(&bin)
            .args(["call", "get", &url, "--field", "data.name", "-f", "support.url"])
            .output()
            .expect("run call")
    })
    .await
    .unwrap();

    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("-> 200"));
    assert!(stdout.contains(r#"data.name = "fuchsia rose""#));
    assert!(stdout.contains("support.url"));

    server.stop().await.unwrap();
}
