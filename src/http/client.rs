//! HTTP client for the Baserow REST API
//!
//! Handles:
//! - Building API URLs from the instance base URL
//! - Attaching authentication headers
//! - Rate limiting (optional)
//! - Mapping error responses to typed errors

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path of the credential exchange endpoint, relative to the API prefix
const TOKEN_AUTH_PATH: &str = "user/token-auth/";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the Baserow instance (without `/api`)
    pub base_url: String,
    /// Request timeout; none means the transport default
    pub timeout: Option<Duration>,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.baserow.io".to_string(),
            timeout: None,
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("baserow-orm/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Request body variants
#[derive(Debug)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// Multipart form (file uploads)
    Multipart(Form),
}

/// Configuration for a single request
#[derive(Debug, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub body: Option<RequestBody>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Set multipart body
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }
}

/// HTTP client bound to one Baserow instance
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    api_base: Url,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client without authentication
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let api_base = api_base_url(&config.base_url)?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            api_base,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(auth_config)?;
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, auth_config: AuthConfig) -> Result<()> {
        let token_url = self.api_url(TOKEN_AUTH_PATH)?;
        self.authenticator = Some(Authenticator::with_client(
            auth_config,
            self.client.clone(),
            token_url.as_str(),
        ));
        Ok(())
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Base URL of the instance
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check whether requests authenticate with a JWT
    pub fn uses_jwt(&self) -> bool {
        self.authenticator.as_ref().is_some_and(Authenticator::is_jwt)
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Resolve a path relative to the API prefix
    pub fn api_url(&self, path: &str) -> Result<Url> {
        Ok(self.api_base.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and parse the JSON response
    ///
    /// Returns `None` for `204 No Content` and empty bodies.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<Option<T>> {
        let url = self.api_url(path)?;

        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let mut req = self.client.request(method.clone(), url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        match config.body {
            Some(RequestBody::Json(body)) => req = req.json(&body),
            Some(RequestBody::Multipart(form)) => req = req.multipart(form),
            None => {}
        }
        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req).await?;
        }

        debug!("{} {}", method, url);
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            debug!("{} {} -> 204", method, url);
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        debug!("{} {} -> {}", method, url, status.as_u16());
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Send a request that must return a JSON body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.request(method.clone(), path, config)
            .await?
            .ok_or_else(|| Error::Other(format!("{method} {path} returned no content")))
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        self.request_json(Method::GET, path, config).await
    }

    /// Make a POST request with a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        self.request_json(Method::POST, path, RequestConfig::new().json(body))
            .await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// `<base_url>/api/` with exactly one slash between the parts
fn api_base_url(base_url: &str) -> Result<Url> {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/api").unwrap_or(base);
    Ok(Url::parse(&format!("{base}/api/"))?)
}

/// Error body Baserow sends with 400 responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    detail: Value,
}

/// Map a non-success response to an error
///
/// 400 responses in Baserow's `{error, detail}` shape become
/// [`Error::BadRequest`]; everything else keeps the status and raw body.
pub fn error_from_response(status: u16, body: &str) -> Error {
    if status == 400 {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            return Error::BadRequest {
                status,
                error: parsed.error,
                detail: parsed.detail,
            };
        }
    }
    Error::http_status(status, body)
}
