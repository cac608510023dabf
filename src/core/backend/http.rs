//! Vault HTTP API backend.
//!
//! Talks to `/v1/...` endpoints with `reqwest`. The token travels in the
//! `X-Vault-Token` header; error bodies of the form `{"errors": [...]}` are
//! surfaced as [`BackendError::Api`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use zeroize::Zeroizing;

use super::{Backend, SealStatus, SecretData};
use crate::core::constants;
use crate::core::credentials::Credentials;
use crate::core::path::SecretPath;
use crate::error::{BackendError, Result, ValidationError};

/// Backend handle bound to one endpoint and token.
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    token: Zeroizing<String>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Deserialize)]
struct KvResponse {
    data: Option<KvData>,
}

#[derive(Deserialize)]
struct KvData {
    data: Option<serde_json::Map<String, Value>>,
}

impl HttpBackend {
    /// Create a client for `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidUrl` unless the endpoint is an
    /// absolute http(s) URL.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let url = parse_endpoint(&credentials.endpoint_url)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("kvault/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BackendError::Transport)?;

        Ok(Self {
            client,
            base: url,
            token: Zeroizing::new(credentials.token.clone()),
        })
    }

    /// Build a request for `/v1/<segments...>`.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `#`, `?` and `%`
    /// inside a name never change which resource is addressed.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("v1").extend(segments);
        }
        debug!(method = %method, url = %url, "backend request");

        let request = self.client.request(method, url);
        if self.token.is_empty() {
            request
        } else {
            request.header(constants::TOKEN_HEADER, self.token.as_str())
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(BackendError::Transport)?;
        check(response).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(BackendError::Transport)?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()).into())
    }
}

/// Parse an endpoint URL, accepting only absolute http(s) URLs.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| ValidationError::InvalidUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl {
            url: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }

    Ok(url)
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let mut errors = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.errors)
        .unwrap_or_default();
    if errors.is_empty() {
        errors.push(
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        );
    }

    debug!(status = status.as_u16(), "backend returned an error");
    Err(BackendError::Api {
        status: status.as_u16(),
        errors,
    }
    .into())
}

/// Segments of `<mount>/<kind>/<sub-path>`; the mount may itself be nested.
fn kv_segments<'a>(kind: &'a str, path: &'a SecretPath) -> Vec<&'a str> {
    let mut segments: Vec<&str> = path.mount().split('/').collect();
    segments.push(kind);
    if !path.is_root() {
        segments.extend(path.sub_path().split('/'));
    }
    segments
}

/// Segments of `sys/mounts/<mount>`.
fn mount_segments(mount: &str) -> Vec<&str> {
    let mut segments = vec!["sys", "mounts"];
    segments.extend(mount.split('/').filter(|s| !s.is_empty()));
    segments
}

fn into_secret_data(map: serde_json::Map<String, Value>) -> SecretData {
    map.into_iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, value)
        })
        .collect()
}

#[async_trait]
impl Backend for HttpBackend {
    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretData>> {
        let response = self
            .request(Method::GET, &kv_segments("data", path))
            .send()
            .await
            .map_err(BackendError::Transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(path = %path, "secret not found");
            return Ok(None);
        }

        let response = check(response).await?;
        let body = response.text().await.map_err(BackendError::Transport)?;
        let parsed: KvResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        Ok(parsed.data.and_then(|d| d.data).map(into_secret_data))
    }

    async fn write_secret(&self, path: &SecretPath, data: &SecretData) -> Result<()> {
        self.send(
            self.request(Method::POST, &kv_segments("data", path))
                .json(&json!({ "data": data })),
        )
        .await?;
        Ok(())
    }

    async fn delete_secret_versions(&self, path: &SecretPath, versions: &[u64]) -> Result<()> {
        self.send(
            self.request(Method::POST, &kv_segments("delete", path))
                .json(&json!({ "versions": versions })),
        )
        .await?;
        Ok(())
    }

    async fn delete_secret_metadata(&self, path: &SecretPath) -> Result<()> {
        self.send(self.request(Method::DELETE, &kv_segments("metadata", path)))
            .await?;
        Ok(())
    }

    async fn mount_engine(&self, mount: &str, engine_type: &str) -> Result<()> {
        self.send(
            self.request(Method::POST, &mount_segments(mount))
                .json(&json!({ "type": engine_type })),
        )
        .await?;
        Ok(())
    }

    async fn unmount_engine(&self, mount: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &mount_segments(mount)))
            .await?;
        Ok(())
    }

    async fn engine_exists(&self, mount: &str) -> Result<bool> {
        let mounts: Value = self
            .send_json(self.request(Method::GET, &["sys", "mounts"]))
            .await?;
        let key = format!("{}/", mount.trim_matches('/'));

        Ok(mounts.get(&key).is_some()
            || mounts
                .get("data")
                .and_then(|d| d.get(&key))
                .is_some())
    }

    async fn seal_status(&self) -> Result<SealStatus> {
        self.send_json(self.request(Method::GET, &["sys", "seal-status"]))
            .await
    }

    async fn seal(&self) -> Result<()> {
        self.send(self.request(Method::PUT, &["sys", "seal"])).await?;
        Ok(())
    }

    async fn submit_unseal_share(&self, share: &str) -> Result<SealStatus> {
        self.send_json(
            self.request(Method::PUT, &["sys", "unseal"])
                .json(&json!({ "key": share })),
        )
        .await
    }
}
