//! HTTP client for the FortiOS CMDB REST API.
//!
//! This module provides HTTP client configuration and the [`CmdbClient`] implementation
//! of [`CmdbTransport`], addressing objects at `/api/v2/cmdb/<path>/<mkey>`.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::query::QueryParams;
use crate::transport::{CmdbTransport, Payload, RequestOptions};
use crate::types::MovePosition;

const USER_AGENT: &str = concat!("fortios-core/", env!("CARGO_PKG_VERSION"));

/// Path prefix of the configuration database API.
pub const CMDB_PREFIX: [&str; 3] = ["api", "v2", "cmdb"];

/// Default request timeout in seconds
pub const FORTIOS_DEFAULT_TIMEOUT: u64 = 20;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default pause between attempts in milliseconds (constant, no backoff)
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts, the pause between retries and
/// connection pooling. The number of retries is chosen per call through
/// [`RequestOptions`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Pause between attempts
    pub retry_delay: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(FORTIOS_DEFAULT_TIMEOUT),
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the pause between attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`CmdbClient`].
#[derive(Debug)]
pub struct CmdbClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    token: Option<SecretString>,
    insecure: bool,
    ca_bundle: Option<PathBuf>,
}

impl CmdbClientBuilder {
    /// Create a new builder for the appliance base URL (e.g. `https://192.168.1.99`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid FortiOS base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        if url.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "FortiOS base URL `{url}` cannot be used as a base"
            )));
        }

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            token: None,
            insecure: false,
            ca_bundle: None,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Authenticate with a REST API administrator token (sent as a bearer token).
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Trust an additional PEM CA bundle.
    #[must_use]
    pub fn with_ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = Some(path.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CmdbClient> {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.http_config.timeout)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if self.insecure {
            warn!("TLS verification disabled for FortiOS client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_bundle) = &self.ca_bundle {
            debug!("loading FortiOS CA bundle from {}", ca_bundle.display());
            let bytes = std::fs::read(ca_bundle).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read FortiOS CA bundle {}: {err}",
                    ca_bundle.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid FortiOS CA bundle: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build FortiOS HTTP client: {err}"))
        })?;

        Ok(CmdbClient {
            http,
            base_url: self.base_url,
            retry_delay: self.http_config.retry_delay,
            token: self.token.map(Arc::new),
        })
    }
}

/// Asynchronous FortiOS CMDB client.
#[derive(Debug, Clone)]
pub struct CmdbClient {
    http: Client,
    base_url: Url,
    retry_delay: Duration,
    token: Option<Arc<SecretString>>,
}

impl CmdbClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        CmdbClientBuilder::new(base_url)?.build()
    }

    /// Access the underlying base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/api/v2/cmdb/<path>[/<mkey>]`. The mkey is one percent-encoded segment.
    fn build_url(&self, path: &str, mkey: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!("Invalid FortiOS base URL `{}`", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(CMDB_PREFIX);
            segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
            if let Some(mkey) = mkey {
                segments.push(mkey);
            }
        }
        Ok(url)
    }

    async fn send<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        params: &[(&'static str, String)],
        options: &RequestOptions,
    ) -> Result<Payload>
    where
        B: Serialize + ?Sized,
    {
        let mut attempt = 0;

        loop {
            let mut request = self.http.request(method.clone(), url.clone()).query(params);

            if let Some(token) = &self.token {
                request = request.bearer_auth(token.expose_secret());
            }
            request = request.header("Accept", "application/json");

            if let Some(payload) = body {
                request = request.json(payload);
            }

            info!(%method, path = url.path(), attempt, "FortiOS request");

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.map_err(Error::from)?;
                    if status.is_success() {
                        return parse_envelope(&text);
                    }
                    map_status_to_error(status, text)
                }
                Err(err) => Error::from(err),
            };

            if !error.is_transient() || attempt >= options.retries {
                return Err(error);
            }

            attempt += 1;
            if self.retry_delay > Duration::from_millis(0) {
                debug!("Retrying FortiOS request after {:?}", self.retry_delay);
                sleep(self.retry_delay).await;
            }
        }
    }
}

/// Parse a FortiOS response envelope, surfacing `"status": "error"` bodies.
fn parse_envelope(text: &str) -> Result<Payload> {
    if text.trim().is_empty() {
        return Ok(Payload::new());
    }

    let envelope: Payload = serde_json::from_str(text)?;

    if envelope.get("status").and_then(Value::as_str) == Some("error") {
        let http_status = envelope
            .get("http_status")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or(0);
        let code = envelope.get("error").and_then(Value::as_i64).unwrap_or(0);
        return Err(Error::ApiError {
            http_status,
            code,
            message: text.to_string(),
        });
    }

    Ok(envelope)
}

/// Pull the object out of a read envelope: `results` is usually a one-element array.
fn first_result(mut envelope: Payload) -> Option<Payload> {
    let object = match envelope.remove("results")? {
        Value::Array(results) => results.into_iter().next()?,
        other => other,
    };
    match object {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("FortiOS authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("FortiOS temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("FortiOS server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("FortiOS error {status}: {text}")),
    }
}

#[async_trait]
impl CmdbTransport for CmdbClient {
    async fn create(
        &self,
        path: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<Payload> {
        let url = self.build_url(path, None)?;
        let params = QueryParams::for_options(options).into_pairs();
        self.send(Method::POST, url, Some(payload), &params, options)
            .await
    }

    async fn read(
        &self,
        path: &str,
        mkey: &str,
        options: &RequestOptions,
    ) -> Result<Option<Payload>> {
        let url = self.build_url(path, Some(mkey))?;
        let params = QueryParams::for_options(options).into_pairs();
        match self
            .send::<()>(Method::GET, url, None, &params, options)
            .await
        {
            Ok(envelope) => Ok(first_result(envelope)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(Error::ApiError { http_status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn update(
        &self,
        path: &str,
        mkey: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<Payload> {
        let url = self.build_url(path, Some(mkey))?;
        let params = QueryParams::for_options(options).into_pairs();
        self.send(Method::PUT, url, Some(payload), &params, options)
            .await
    }

    async fn delete(&self, path: &str, mkey: &str, options: &RequestOptions) -> Result<()> {
        let url = self.build_url(path, Some(mkey))?;
        let params = QueryParams::for_options(options).into_pairs();
        self.send::<()>(Method::DELETE, url, None, &params, options)
            .await
            .map(|_| ())
    }

    async fn move_entry(
        &self,
        path: &str,
        mkey: &str,
        position: MovePosition,
        neighbor: &str,
        options: &RequestOptions,
    ) -> Result<()> {
        let url = self.build_url(path, Some(mkey))?;
        let params = QueryParams::for_options(options)
            .with_move(position, neighbor)
            .into_pairs();
        self.send::<()>(Method::PUT, url, None, &params, options)
            .await
            .map(|_| ())
    }
}
