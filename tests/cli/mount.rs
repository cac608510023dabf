//! Tests for mount and unmount.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::support::server::{serve_mounts, vault};
use crate::support::*;

#[tokio::test(flavor = "multi_thread")]
async fn test_mount_new_engine() {
    let server = vault(false).await;
    serve_mounts(&server, &["secret", "sys"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/mounts/kv"))
        .and(body_json(json!({ "type": "kv-v2" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["mount", "kv"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Successfully mounted kv");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mount_trims_slashes() {
    let server = vault(false).await;
    serve_mounts(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/mounts/kv"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["mount", "/kv/"]);
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mount_existing_engine_fails() {
    let server = vault(false).await;
    serve_mounts(&server, &["secret"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/mounts/secret"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["mount", "secret"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "a secret engine already exists at secret");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mount_backend_error_is_reported() {
    let server = vault(false).await;
    serve_mounts(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/v1/sys/mounts/kv"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
        )
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["mount", "kv"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "permission denied");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unmount_engine() {
    let server = vault(false).await;
    serve_mounts(&server, &["kv"]).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/sys/mounts/kv"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["unmount", "kv"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Successfully unmounted kv");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unmount_missing_engine_fails() {
    let server = vault(false).await;
    serve_mounts(&server, &["secret"]).await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["unmount", "kv"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "secret engine kv does not exist");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mount_on_sealed_vault() {
    let server = vault(true).await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["mount", "kv"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "vault is sealed");
}
