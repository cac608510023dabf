//! Tests for push.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::support::server::{serve_secret, vault};
use crate::support::*;

#[tokio::test(flavor = "multi_thread")]
async fn test_push_dotenv() {
    let server = vault(false).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .and(header("X-Vault-Token", ROOT_TOKEN))
        .and(body_json(json!({ "data": { "foo": "bar", "baz": "qux" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "version": 1 } })))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Secrets written to secret/app.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_json_file() {
    let server = vault(false).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .and(body_json(json!({ "data": { "foo": "bar", "port": "8080" } })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write("env.json", SAMPLE_JSON);

    let output = t.remote(&server.uri(), &["push", "env.json", "secret/app"]);
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_complex_dotenv() {
    let server = vault(false).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .and(body_json(json!({
            "data": {
                "SIMPLE": "value",
                "QUOTED": "quoted value",
                "SINGLE_QUOTED": "single quoted",
                "EXPORTED": "yes",
                "SPECIAL_CHARS": "p@ssw0rd!$%"
            }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV_COMPLEX);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app"]);
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_existing_path_declined_without_tty() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "foo": "old" })).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app"]);
    assert_exit_code(&output, 0);
    assert_stderr_contains(&output, "Aborting");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_existing_path_with_force() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "foo": "old" })).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app", "--force"]);
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_missing_env_file_warns() {
    let server = vault(false).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();

    let output = t.remote(&server.uri(), &["push", "missing.env", "secret/app"]);
    assert_exit_code(&output, 0);
    assert_stderr_contains(&output, "Nothing to push");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_uses_cwd_option() {
    let server = vault(false).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let t = Test::new();
    std::fs::create_dir(t.dir.path().join("project")).unwrap();
    t.write("project/.env", SAMPLE_ENV);

    let output = t.remote(
        &server.uri(),
        &["--cwd", "project", "push", ".env", "secret/app"],
    );
    assert_success(&output);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_sealed_vault_fails() {
    let server = vault(true).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app"]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "vault is sealed");
    assert_stderr_contains(&output, "kvault unseal");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_never_truncates_path_at_hash() {
    let server = vault(false).await;
    serve_secret(&server, "secret", "app", json!({ "keep": "me" })).await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app%23prod"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    let output = t.remote(&server.uri(), &["push", ".env", "secret/app#prod"]);
    assert_success(&output);
}
