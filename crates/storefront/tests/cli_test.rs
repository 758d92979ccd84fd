//! Integration tests for the `storefront` CLI binary.
//!
//! Argument parsing, help output and completions run without a backend.
//! The session tests point the binary at a wiremock server through
//! `STOREFRONT_*` environment overrides.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `storefront` binary with env isolation.
///
/// Clears all `STOREFRONT_*` variables and points config directories at
/// `home` so tests never touch the user's real configuration.
fn storefront_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("storefront");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("STOREFRONT_PROFILE")
        .env_remove("STOREFRONT_API_URL")
        .env_remove("STOREFRONT_OUTPUT")
        .env_remove("STOREFRONT_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Same, with the default profile keeping its session in `session.json`
/// (pre-seeded with `token` when given) and talking to `api_url`.
fn session_cmd(home: &Path, api_url: &str, token: Option<&str>) -> assert_cmd::Command {
    let session = home.join("session.json");
    if let Some(token) = token {
        std::fs::write(&session, json!({ "token": token }).to_string()).unwrap();
    }
    let mut cmd = storefront_cmd(home);
    cmd.env("STOREFRONT_API_URL", api_url)
        .env("STOREFRONT_PROFILES__DEFAULT__TOKEN_STORE", "file")
        .env("STOREFRONT_PROFILES__DEFAULT__TOKEN_FILE", &session);
    cmd
}

fn stored_token(home: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(home.join("session.json")).ok()?;
    let map: serde_json::Value = serde_json::from_str(&raw).ok()?;
    map.get("token")?.as_str().map(str::to_owned)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = storefront_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("addresses")
            .and(predicate::str::contains("wishlist"))
            .and(predicate::str::contains("checkout"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("storefront"));
}

#[test]
fn completions_for_each_shell() {
    let home = tempfile::tempdir().unwrap();
    for shell in ["bash", "zsh", "fish"] {
        storefront_cmd(home.path())
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .arg("teleport")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn invalid_output_format_rejected() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["-o", "xml", "orders", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn checkout_requires_items() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["checkout", "--payment", "card"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--item"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_set_then_show() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["config", "set", "api_url", "https://shop.example.com"])
        .assert()
        .success();
    storefront_cmd(home.path())
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://shop.example.com"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    storefront_cmd(home.path())
        .args(["--profile", "staging", "orders", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'staging' not found"));
}

// ── Session-backed commands ─────────────────────────────────────────

#[test]
fn account_commands_require_sign_in() {
    let home = tempfile::tempdir().unwrap();
    session_cmd(home.path(), "http://127.0.0.1:9", None)
        .args(["addresses", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not signed in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn lists_addresses_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/addresses"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "addressLine": "1 Main St",
            "city": "Springfield",
            "postalCode": "12345",
            "country": "US",
            "phone": "555-0100",
            "isDefault": true
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = session_cmd(home.path(), &server.uri(), Some("tok-1"))
        .args(["addresses", "list", "-o", "json-compact"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["id"], json!("7"));
    assert_eq!(parsed[0]["isDefault"], json!(true));
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_session_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    session_cmd(home.path(), &server.uri(), Some("stale"))
        .args(["orders", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("session has expired"));

    assert_eq!(stored_token(home.path()), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_message_reaches_the_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Order not found" })),
        )
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    session_cmd(home.path(), &server.uri(), Some("tok-1"))
        .args(["orders", "show", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_without_terminal_needs_yes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "productId": "sku-1", "name": "Mug", "price": 1200 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/wishlist/sku-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    session_cmd(home.path(), &server.uri(), Some("tok-1"))
        .args(["wishlist", "remove", "sku-1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));

    session_cmd(home.path(), &server.uri(), Some("tok-1"))
        .args(["--yes", "wishlist", "remove", "sku-1"])
        .assert()
        .success();
}
