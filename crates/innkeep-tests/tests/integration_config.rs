// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! Loads real files from a temp directory with an injected environment, then
//! checks that the runtime can build a working server from them.
//!
//! ## Test Categories
//!
//! - `test_load_*`: file formats, placeholders, overrides
//! - `test_reject_*`: invalid configurations
//! - `test_runtime_*`: file to running router

use std::collections::HashMap;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;

use innkeep_bin::runtime::{api_config, RuntimeBuilder};
use innkeep_config::{ConfigError, ConfigLoader, LogFormat, LogLevel};
use innkeep_tests::common::temp_test_dir;
use innkeep_tests::prelude::*;

// =============================================================================
// Helpers
// =============================================================================

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write config file");
    path
}

fn loader(vars: &[(&str, &str)]) -> ConfigLoader {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new().with_env_map(env)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_yaml() {
    let dir = temp_test_dir("innkeep-yaml");
    let path = write(
        &dir,
        "innkeep.yaml",
        r#"
server:
  bind_address: 127.0.0.1
  port: 8080
auth:
  secret: yaml-secret-that-is-long-enough-for-tests
  token_ttl_secs: 600
logging:
  level: debug
  format: json
"#,
    );

    let config = loader(&[]).load(&path).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8080");
    assert_eq!(config.auth.token_ttl_secs, 600);
    assert_eq!(config.auth.token_header, "X-Access-Token");
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_load_toml() {
    let dir = temp_test_dir("innkeep-toml");
    let path = write(
        &dir,
        "innkeep.toml",
        r#"
[server]
port = 9000

[auth]
secret = "toml-secret-that-is-long-enough-for-tests"
token_header = "X-Session"
"#,
    );

    let config = loader(&[]).load(&path).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.auth.token_header, "X-Session");
    assert_eq!(config.auth.token_ttl_secs, 4 * 60 * 60);
}

#[test]
fn test_load_json() {
    let dir = temp_test_dir("innkeep-json");
    let path = write(
        &dir,
        "innkeep.json",
        r#"{ "auth": { "secret": "json-secret-that-is-long-enough-for-tests" } }"#,
    );

    let config = loader(&[]).load(&path).unwrap();
    assert_eq!(config.server.port, 5000);
    assert!(config.auth.secret.is_some());
}

#[test]
fn test_load_placeholders() {
    let dir = temp_test_dir("innkeep-placeholders");
    let path = write(
        &dir,
        "innkeep.yaml",
        r#"
server:
  port: ${PORT:7000}
auth:
  secret: "${SIGNING_KEY}"
"#,
    );

    let config = loader(&[("SIGNING_KEY", "from-placeholder-secret-long-enough")])
        .load(&path)
        .unwrap();
    assert_eq!(config.server.port, 7000);
    assert_eq!(
        config.auth.secret.as_ref().unwrap().expose(),
        "from-placeholder-secret-long-enough"
    );
}

#[test]
fn test_load_env_overrides_file() {
    let dir = temp_test_dir("innkeep-overrides");
    let path = write(
        &dir,
        "innkeep.yaml",
        r#"
server:
  port: 8080
auth:
  secret: file-secret-that-is-long-enough-for-tests
"#,
    );

    let config = loader(&[
        ("INNKEEP_SERVER_PORT", "9999"),
        ("INNKEEP_AUTH_SECRET", "env-secret-that-is-long-enough-for-tests"),
        ("INNKEEP_TOKEN_TTL_SECS", "120"),
        ("INNKEEP_LOG_LEVEL", "warn"),
    ])
    .load(&path)
    .unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(
        config.auth.secret.as_ref().unwrap().expose(),
        "env-secret-that-is-long-enough-for-tests"
    );
    assert_eq!(config.auth.token_ttl_secs, 120);
    assert_eq!(config.logging.level, LogLevel::Warn);
}

#[test]
fn test_load_plain_jwt_secret_variable() {
    let config = loader(&[("JWT_SECRET", "plain-env-secret-that-is-long-enough")])
        .load_defaults()
        .unwrap();
    assert!(config.auth.secret.is_some());
}

#[test]
fn test_load_secret_is_masked_in_debug() {
    let config = loader(&[("JWT_SECRET", "never-print-this-secret-value")])
        .load_defaults()
        .unwrap();
    assert!(!format!("{:?}", config).contains("never-print-this-secret-value"));
}

// =============================================================================
// Rejection
// =============================================================================

#[test]
fn test_reject_missing_secret() {
    let err = loader(&[]).load_defaults().unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { .. }), "{:?}", err);
}

#[test]
fn test_reject_empty_secret() {
    let dir = temp_test_dir("innkeep-empty-secret");
    let path = write(&dir, "innkeep.yaml", "auth:\n  secret: \"   \"\n");

    let err = loader(&[]).load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }), "{:?}", err);
}

#[test]
fn test_reject_unknown_field() {
    let dir = temp_test_dir("innkeep-unknown");
    let path = write(
        &dir,
        "innkeep.yaml",
        "auth:\n  secret: long-enough-secret-for-this-test\n  algorithm: HS512\n",
    );

    assert!(loader(&[]).load(&path).is_err());
}

#[test]
fn test_reject_bad_env_port() {
    let err = loader(&[
        ("JWT_SECRET", "long-enough-secret-for-this-test"),
        ("INNKEEP_SERVER_PORT", "not-a-port"),
    ])
    .load_defaults()
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { .. }), "{:?}", err);
}

#[test]
fn test_reject_unsupported_extension() {
    let dir = temp_test_dir("innkeep-ini");
    let path = write(&dir, "innkeep.ini", "[auth]\nsecret=x\n");

    let err = loader(&[]).load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }), "{:?}", err);
}

// =============================================================================
// Runtime
// =============================================================================

#[tokio::test]
async fn test_runtime_serves_from_config_file() {
    let dir = temp_test_dir("innkeep-runtime");
    let path = write(
        &dir,
        "innkeep.yaml",
        r#"
auth:
  secret: runtime-secret-that-is-long-enough-for-tests
  token_ttl_secs: 900
"#,
    );

    let runtime = RuntimeBuilder::new()
        .config_path(&path)
        .loader(loader(&[]))
        .port(Some(0))
        .build()
        .unwrap();

    let api = api_config(runtime.config()).unwrap();
    assert_eq!(api.jwt.token_ttl_secs, 900);

    let router = runtime.build_server().unwrap().router();
    let health = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let protected = router
        .oneshot(Request::get("/api/v1/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(protected.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_runtime_falls_back_to_environment() {
    let dir = temp_test_dir("innkeep-fallback");

    let runtime = RuntimeBuilder::new()
        .config_path(dir.path().join("missing.yaml"))
        .loader(loader(&[("INNKEEP_AUTH_SECRET", "env-only-secret-that-is-long-enough")]))
        .build()
        .unwrap();
    assert!(runtime.build_server().is_ok());
}
