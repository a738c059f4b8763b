//! Drives the real process runner against a shell script standing in for `coho`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use coho_mcp::{CohoMcpCore, CredentialStore, Dispatcher, ProcessRunner, ServerSettings};
use coho_mcp_types::Credentials;
use serde_json::json;

const FAKE_COHO: &str = r#"#!/bin/sh
case "$1" in
  query)
    printf '[{"name":"Joe","args":"%s"}]' "$*"
    ;;
  log)
    echo "invalid admin token: $*" >&2
    exit 2
    ;;
  *)
    ;;
esac
"#;

#[tokio::test]
async fn fake_cli_output_is_shaped_and_redacted() {
    let workspace = tempfile::tempdir().unwrap();
    let script = workspace.path().join("coho");
    fs::write(&script, FAKE_COHO).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let settings = ServerSettings::default()
        .with_cli_program(script.to_string_lossy())
        .with_scratch_dir(workspace.path().join("scratch"));
    let credentials = CredentialStore::new(Credentials::new(Some("proj1".into()), None, Some("tkn_abc123".into())));
    let core = CohoMcpCore::new(Dispatcher::new(&settings, credentials, Arc::new(ProcessRunner)));

    let query = core
        .call("query_collection", json!({ "collection": "users" }).as_object().cloned())
        .await
        .unwrap();
    let text = query.content[0].as_text().unwrap().text.clone();
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("pretty JSON");
    assert_eq!(parsed[0]["name"], "Joe");
    let echoed = parsed[0]["args"].as_str().unwrap();
    assert!(echoed.contains("--limit 100 --project proj1 --space dev --admintoken [REDACTED]"), "{echoed}");

    let logs = core.call("query_logs", None).await.unwrap();
    assert_eq!(logs.is_error, Some(true));
    let text = logs.content[0].as_text().unwrap().text.clone();
    assert!(text.contains("exited with status 2"), "{text}");
    assert!(!text.contains("tkn_abc123"), "{text}");

    let silent = core
        .call("create_collection", json!({ "collection": "orders" }).as_object().cloned())
        .await
        .unwrap();
    assert_eq!(silent.content[0].as_text().unwrap().text, "Command completed successfully.");
}
