//! Tests for rm.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::support::server::{serve_secret, vault};
use crate::support::*;

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_everything() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "foo": "bar" })).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/secret/metadata/app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["rm", "secret/app", "--force"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Successfully removed secret/app");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_versions() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "foo": "bar" })).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/delete/app"))
        .and(body_json(json!({ "versions": [1, 3] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["rm", "secret/app", "1", "3", "-f"]);
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_missing_path() {
    let server = vault(false).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["rm", "secret/app", "--force"]);
    assert_exit_code(&output, 0);
    assert_stderr_contains(&output, "The path secret/app does not exist. Nothing to remove.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_declined_without_terminal() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "foo": "bar" })).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["rm", "secret/app"]);
    assert_exit_code(&output, 0);
    assert_stderr_contains(&output, "Aborted.");
}
