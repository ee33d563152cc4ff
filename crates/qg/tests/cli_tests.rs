//! CLI surface tests: argument wiring and the checks that must fire
//! before any network traffic.

use std::process::Command;

fn qg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qg"))
}

#[test]
fn help_lists_every_subcommand() {
    let out = qg().arg("--help").output().expect("failed to run qg");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    for cmd in [
        "validate",
        "link",
        "sync-branches",
        "branch",
        "execution-start",
    ] {
        assert!(stdout.contains(cmd), "missing subcommand in help: {cmd}");
    }
}

#[test]
fn validate_requires_server_credentials() {
    let out = qg()
        .args(["validate", "--gate", "strict"])
        .output()
        .expect("failed to run qg");
    assert_eq!(out.status.code(), Some(2), "expected a usage error");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--server"));
}

#[test]
fn validate_requires_a_key_or_its_parts() {
    let out = qg()
        .args([
            "validate",
            "--server",
            "http://127.0.0.1:1",
            "--login",
            "user",
            "--password",
            "secret",
            "--gate",
            "strict",
        ])
        .output()
        .expect("failed to run qg");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--project-key"), "stderr: {stderr}");
}

#[test]
fn unreadable_execution_start_fails_before_any_request() {
    let out = qg()
        .args([
            "validate",
            "--server",
            "http://127.0.0.1:1",
            "--login",
            "user",
            "--password",
            "secret",
            "--group",
            "be.viae",
            "--artifact",
            "gate",
            "--gate",
            "strict",
            "--execution-start",
            "yesterday-ish",
        ])
        .output()
        .expect("failed to run qg");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid execution start 'yesterday-ish'"), "stderr: {stderr}");
}

#[test]
fn malformed_repo_mapping_is_rejected() {
    let out = qg()
        .args([
            "sync-branches",
            "--server",
            "http://127.0.0.1:1",
            "--login",
            "user",
            "--password",
            "secret",
            "--repo-login",
            "repo-user",
            "--repo-password",
            "repo-secret",
            "--repo",
            "missing-the-url-half",
        ])
        .output()
        .expect("failed to run qg");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid repo mapping"), "stderr: {stderr}");
}
