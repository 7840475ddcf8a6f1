//! HTTP client configuration and the shared REST transport.
//!
//! [`RestClient`] sends one JSON request per call against a resolved regional
//! endpoint and hands back the raw status and body. Resource clients decide
//! which statuses count as success, absence or failure.

use crate::auth::{StaticToken, TokenProvider, AUTH_TOKEN_HEADER};
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default timeout for Neutron requests (seconds)
pub const NEUTRON_DEFAULT_TIMEOUT: u64 = 20;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools (seconds)
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const USER_AGENT: &str = concat!("neutron-core/", env!("CARGO_PKG_VERSION"));
const JSON: &str = "application/json";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify TLS certificates
    pub tls_verify: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(NEUTRON_DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            tls_verify: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
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

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Build a `reqwest` client from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the underlying client cannot be built.
    pub fn build_http(&self) -> Result<Client> {
        let mut builder = ClientBuilder::new()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .danger_accept_invalid_certs(!self.tls_verify);

        if !self.enable_compression {
            builder = builder.no_gzip();
        }

        builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body as lossy UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the body is empty or not valid JSON for `R`.
    pub fn json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        if self.body.is_empty() {
            return Err(Error::ParseError(format!(
                "Empty response body for `{path}` (status {})",
                self.status
            )));
        }
        serde_json::from_slice(&self.body).map_err(|err| {
            Error::ParseError(format!("Failed to parse response for `{path}`: {err}"))
        })
    }

    /// Convert a non-success response into an error; pass successes through.
    ///
    /// # Errors
    ///
    /// Returns the error built by [`Error::from_status`] for non-2xx statuses.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(Error::from_status(self.status, self.text()))
        }
    }
}

/// Builder for [`RestClient`].
#[derive(Clone)]
pub struct RestClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl RestClientBuilder {
    /// Create a new builder from the provided endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid Neutron endpoint `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            tokens: None,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Send a fixed token as `X-Auth-Token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty.
    pub fn with_token(self, token: impl Into<String>) -> Result<Self> {
        Ok(self.with_token_provider(Arc::new(StaticToken::new(token)?)))
    }

    /// Use a custom token provider.
    #[must_use]
    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no token provider was configured or
    /// the HTTP client cannot be built.
    pub fn build(self) -> Result<RestClient> {
        let tokens = self.tokens.ok_or_else(|| {
            Error::ConfigError("a token or token provider is required".to_string())
        })?;
        RestClient::new(self.base_url, tokens, &self.http_config)
    }
}

/// JSON transport bound to one regional endpoint and one token provider.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a transport for `base_url`.
    ///
    /// The URL is normalized to end in `/` so relative resource paths append
    /// to it instead of replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the URL cannot
    /// be a base.
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn TokenProvider>,
        config: &ClientConfig,
    ) -> Result<Self> {
        Self::from_parts(config.build_http()?, base_url, tokens)
    }

    /// Create a transport reusing an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be a base.
    pub fn from_parts(http: Client, base_url: Url, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base(base_url)?,
            tokens,
        })
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);
        self.base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }

    /// Send a request without a body.
    ///
    /// # Errors
    ///
    /// Returns transport and authentication errors; HTTP error statuses are
    /// returned as a [`RawResponse`].
    pub async fn send(&self, method: Method, path: &str) -> Result<RawResponse> {
        self.send_json::<()>(method, path, None).await
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns transport and authentication errors; HTTP error statuses are
    /// returned as a [`RawResponse`].
    pub async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path)?;
        let token = self.tokens.token().await?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, JSON)
            .header(AUTH_TOKEN_HEADER, token.expose_secret());
        if let Some(payload) = body {
            request = request.header(CONTENT_TYPE, JSON).json(payload);
        }

        info!(%method, path, "Neutron request");

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::Transport(format!("Failed to read response body: {err}"))
        })?;

        debug!(%method, path, status = status.as_u16(), "Neutron response");

        Ok(RawResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}

/// Build `{collection}/{id}` for a single resource.
///
/// `id` must stay one path segment after URL resolution, so blank ids,
/// separators (`/`, `\`, `?`, `#`) and dot segments (`.`, `..`, including
/// their `%2e` spellings) are rejected.
///
/// # Errors
///
/// Returns [`Error::ValidationError`] if `id` is not a usable segment.
pub fn resource_path(collection: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(Error::ValidationError(format!(
            "{collection}: id is required"
        )));
    }
    if id.contains(['/', '\\', '?', '#']) {
        return Err(Error::ValidationError(format!(
            "{collection}: id `{id}` contains reserved characters"
        )));
    }
    let decoded = id.to_ascii_lowercase().replace("%2e", ".");
    if decoded == "." || decoded == ".." {
        return Err(Error::ValidationError(format!(
            "{collection}: id `{id}` is a dot segment"
        )));
    }
    Ok(format!("{collection}/{id}"))
}

fn normalize_base(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "`{url}` cannot be used as a base URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockTokenProvider;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rest(server: &MockServer) -> RestClient {
        RestClientBuilder::new(format!("{}/v2.0", server.uri()))
            .unwrap()
            .with_token("token-123")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new();
        assert_eq!(config.timeout, Duration::from_secs(NEUTRON_DEFAULT_TIMEOUT));
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.enable_compression);
        assert!(config.tls_verify);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_connect_timeout(Duration::from_secs(3))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false)
            .with_tls_verify(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_normalize_base_appends_slash() {
        let url = normalize_base(Url::parse("http://localhost:9696/v2.0").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9696/v2.0/");

        let url = normalize_base(Url::parse("http://localhost:9696/v2.0/").unwrap()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9696/v2.0/");
    }

    #[test]
    fn test_normalize_base_rejects_non_base() {
        let err = normalize_base(Url::parse("mailto:ops@example.com").unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_build_url_keeps_version_segment() {
        let server = MockServer::start().await;
        let client = rest(&server);
        let url = client.build_url("/networks/abc").unwrap();
        assert!(url.as_str().ends_with("/v2.0/networks/abc"));
    }

    #[tokio::test]
    async fn test_send_json_sets_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2.0/networks"))
            .and(header("X-Auth-Token", "token-123"))
            .and(header("Accept", "application/json"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"network": {"name": "n1"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = rest(&server)
            .send_json(
                Method::POST,
                "networks",
                Some(&json!({"network": {"name": "n1"}})),
            )
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::CREATED);
        let value: serde_json::Value = response.json("networks").unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks/gone"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let response = rest(&server)
            .send(Method::GET, "networks/gone")
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.error_for_status().unwrap_err(),
            Error::ServerError {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_token_failure_prevents_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut tokens = MockTokenProvider::new();
        tokens
            .expect_token()
            .returning(|| Err(Error::Authentication("no session".to_string())));

        let base = Url::parse(&server.uri()).unwrap();
        let client = RestClient::new(base, Arc::new(tokens), &ClientConfig::new()).unwrap();
        let err = client.send(Method::GET, "networks").await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[tokio::test]
    async fn test_token_is_fetched_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/networks"))
            .and(header("X-Auth-Token", "rotating"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let mut tokens = MockTokenProvider::new();
        tokens
            .expect_token()
            .times(2)
            .returning(|| Ok(SecretString::from("rotating")));

        let base = Url::parse(&server.uri()).unwrap();
        let client = RestClient::new(base, Arc::new(tokens), &ClientConfig::new()).unwrap();
        client.send(Method::GET, "networks").await.unwrap();
        client.send(Method::GET, "networks").await.unwrap();
    }

    #[test]
    fn test_builder_requires_token() {
        let err = RestClientBuilder::new("http://localhost:9696")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        assert!(matches!(
            RestClientBuilder::new("not a url"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_resource_path_accepts_plain_id() {
        assert_eq!(
            resource_path("networks", "624312ff-d14b-4ba3-9834-1c78d23d574d").unwrap(),
            "networks/624312ff-d14b-4ba3-9834-1c78d23d574d"
        );
        assert_eq!(resource_path("networks", "a.b").unwrap(), "networks/a.b");
        assert_eq!(resource_path("networks", "...").unwrap(), "networks/...");
    }

    #[test]
    fn test_resource_path_rejects_unusable_ids() {
        for id in [
            "", "  ", ".", "..", "%2e", "%2E%2e", ".%2e", "a/b", "a\\b", "a?b", "a#b",
        ] {
            assert!(
                matches!(resource_path("networks", id), Err(Error::ValidationError(_))),
                "id {id:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = RestClientBuilder::new(format!("http://127.0.0.1:{port}/v2.0"))
            .unwrap()
            .with_token("token-123")
            .unwrap()
            .build()
            .unwrap();

        let err = client.send(Method::GET, "networks").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {err:?}");
        assert!(err.is_transient());
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"networks": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = RestClientBuilder::new(format!("{}/v2.0", server.uri()))
            .unwrap()
            .with_http_config(ClientConfig::new().with_timeout(Duration::from_millis(200)))
            .with_token("token-123")
            .unwrap()
            .build()
            .unwrap();

        let err = client.send(Method::GET, "networks").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
        assert!(err.is_transient());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_raw_response_json_empty_body() {
        let response = RawResponse {
            status: StatusCode::NO_CONTENT,
            body: Vec::new(),
        };
        let err = response.json::<serde_json::Value>("networks").unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
