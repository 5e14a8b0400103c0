#![allow(deprecated)] // cargo_bin is deprecated but still supported by assert_cmd
//! Exit-code and output contract for the `radport` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `radport` with all portal env vars cleared.
fn radport() -> Command {
    let mut cmd = Command::cargo_bin("radport").expect("radport binary");
    for var in [
        "RADPORT_URL",
        "RADPORT_GRAPHQL_PATH",
        "RADPORT_TOKEN",
        "RADPORT_ROLE",
        "RADPORT_COOKIE",
        "RADPORT_TIMEOUT",
        "RADPORT_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "error");
    cmd
}

async fn run(mut cmd: Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("run radport"))
        .await
        .expect("join")
}

#[test]
fn help_lists_commands() {
    radport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cases"))
        .stdout(predicate::str::contains("diagnose"))
        .stdout(predicate::str::contains("upload"));
}

#[test]
fn version_prints_package_version() {
    radport()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn diagnose_short_comment_exits_1_without_network() {
    radport()
        .args(["--url", "http://127.0.0.1:9", "diagnose", "pd-1", "--approve", "-m", "corto"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least 10 characters"));
}

#[test]
fn diagnose_requires_a_decision() {
    radport()
        .args(["diagnose", "pd-1", "-m", "comentario suficiente"])
        .assert()
        .code(2);
}

#[test]
fn cases_without_token_exits_3() {
    radport()
        .args(["--url", "http://127.0.0.1:9", "cases"])
        .assert()
        .code(3);
}

#[test]
fn cases_placeholder_on_error_succeeds() {
    radport()
        .args([
            "--url",
            "http://127.0.0.1:9",
            "cases",
            "--placeholder-on-error",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"placeholder\""))
        .stderr(predicate::str::contains("showing placeholder data"));
}

#[test]
fn invalid_url_is_a_config_error() {
    radport()
        .args(["--url", "not a url", "--token", "tok", "cases"])
        .assert()
        .code(2);
}

#[test]
fn upload_rejects_non_image_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "not an image").unwrap();

    radport()
        .args(["--url", "http://127.0.0.1:9", "--token", "tok", "upload"])
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Only image files"));
}

#[tokio::test]
async fn cases_json_from_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getCases": [
                { "id": "c-1", "status": "Validated", "uploadDate": "2024-03-05T14:07:00Z",
                  "modelResult": { "probability": 0.91, "label": "NEUMONIA" } },
                { "id": "c-2", "status": "pending" }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = radport();
    cmd.args(["--url", &server.uri(), "--token", "tok-1", "cases", "--format", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{:?}", output);

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["source"], "live");
    assert_eq!(doc["counts"]["total"], 2);
    assert_eq!(doc["counts"]["urgent"], 1);
    assert_eq!(doc["cases"][0]["status"], "validado");
    assert_eq!(doc["cases"][0]["urgency"], "urgent");
    assert_eq!(doc["cases"][1]["status"], "subido");
}

#[tokio::test]
async fn urgent_filter_counts_only_listed_cases() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "getCases": [
                { "id": "u-1", "estado": "Procesado", "aiConfidence": 0.88 },
                { "id": "r-1", "estado": "Procesado", "aiConfidence": 0.12 },
                { "id": "r-2", "estado": "Validado", "urgency": "routine", "aiConfidence": 0.95 }
            ]}
        })))
        .mount(&server)
        .await;

    let mut cmd = radport();
    cmd.args([
        "--url",
        &server.uri(),
        "--token",
        "tok",
        "cases",
        "--urgent",
        "--format",
        "json",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{:?}", output);

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    let cases = doc["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["id"], "u-1");
    assert_eq!(doc["counts"]["total"], 1);
    assert_eq!(doc["counts"]["urgent"], 1);
    assert_eq!(doc["counts"]["validated"], 0);
}

#[tokio::test]
async fn backend_401_exits_3() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validation"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let mut cmd = radport();
    cmd.args(["--url", &server.uri(), "--token", "stale", "whoami"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test]
async fn prediagnostic_missing_exits_1() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "getPreDiagnostic": null } })),
        )
        .mount(&server)
        .await;

    let mut cmd = radport();
    cmd.args(["--url", &server.uri(), "--token", "tok", "prediagnostic", "pd-404"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pd-404"));
}

#[tokio::test]
async fn login_prints_cookie_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc", "id": 7, "nombre": "Ana", "rol": "doctor"
        })))
        .mount(&server)
        .await;

    let mut cmd = radport();
    cmd.args([
        "--url",
        &server.uri(),
        "login",
        "--email",
        "ana@example.com",
        "--password",
        "secret",
    ]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("auth-token=jwt-abc"));
    assert!(stdout.contains("user-role=doctor"));
}
