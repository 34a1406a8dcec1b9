//! Integration tests for the `unifi-exporter` binary.
//!
//! Startup paths only: argument parsing, config errors and controller
//! failures that end the process before the HTTP server starts.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation.
///
/// Clears `UNIFI_EXPORTER_*` variables and points config directories at a
/// nonexistent path so tests never read the user's real configuration.
fn exporter_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("unifi-exporter");
    cmd.env("HOME", "/tmp/unifi-exporter-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/unifi-exporter-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("UNIFI_EXPORTER_CONFIG")
        .env_remove("UNIFI_EXPORTER_PASSWORD")
        .env_remove("UNIFI_EXPORTER_CONTROLLER__URL")
        .env_remove("UNIFI_EXPORTER_CONTROLLER__USERNAME")
        .env_remove("UNIFI_EXPORTER_CONTROLLER__SITE");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    exporter_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Prometheus")
            .and(predicate::str::contains("--site"))
            .and(predicate::str::contains("--metrics-path")),
    );
}

#[test]
fn test_version_flag() {
    exporter_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unifi-exporter"));
}

#[test]
fn test_unknown_platform_is_usage_error() {
    exporter_cmd()
        .args(["--platform", "cloud"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_controller_url() {
    exporter_cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller.url"));
}

#[test]
fn test_missing_config_file() {
    exporter_cmd()
        .args(["--config", "/tmp/unifi-exporter-test-nonexistent/absent.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn test_reserved_metrics_path() {
    exporter_cmd()
        .args(["--metrics-path", "/health"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("metrics_path"));
}

#[test]
fn test_invalid_namespace() {
    exporter_cmd()
        .args(["--namespace", "my-ns"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("namespace"));
}

#[test]
fn test_print_config_shows_default_timeout() {
    exporter_cmd()
        .arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 5"));
}

#[test]
fn test_print_config_redacts_password() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("exporter.toml");
    std::fs::write(
        &file,
        "[controller]\nurl = \"https://unifi.lan\"\nusername = \"exporter\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    exporter_cmd()
        .arg("--config")
        .arg(&file)
        .args(["--site", "Foo", "--print-config"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("<redacted>")
                .and(predicate::str::contains("site = \"Foo\""))
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Controller failures ─────────────────────────────────────────────

#[test]
fn test_unreachable_controller() {
    exporter_cmd()
        .args([
            "--controller",
            "http://127.0.0.1:1",
            "--username",
            "exporter",
            "--platform",
            "classic",
        ])
        .env("UNIFI_EXPORTER_PASSWORD", "pw")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_site_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [
                { "_id": "s1", "name": "default", "desc": "Default" },
                { "_id": "s2", "name": "x7k2pq", "desc": "Foo" }
            ]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        exporter_cmd()
            .args([
                "--controller",
                uri.as_str(),
                "--username",
                "exporter",
                "--platform",
                "classic",
                "--site",
                "Qux",
            ])
            .env("UNIFI_EXPORTER_PASSWORD", "pw")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("was not found in UniFi Controller"),
        "unexpected stderr:\n{stderr}"
    );
    assert!(stderr.contains("Default, Foo"), "unexpected stderr:\n{stderr}");
}
