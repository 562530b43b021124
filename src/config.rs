//! Client configuration
//!
//! A [`ClientConfig`] describes how to reach one Baserow instance. It can be
//! built in code, loaded from a YAML or JSON file, or read from the
//! `BASEROW_*` environment variables.
//!
//! ```yaml
//! url: https://baserow.example.com
//! token: db-token
//! user_field_names: true
//! timeout_secs: 30
//! max_concurrent_pages: 4
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 10
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the instance URL
pub const ENV_URL: &str = "BASEROW_URL";
/// Environment variable holding a database token
pub const ENV_TOKEN: &str = "BASEROW_TOKEN";
/// Environment variable holding the login email
pub const ENV_EMAIL: &str = "BASEROW_EMAIL";
/// Environment variable holding the login password
pub const ENV_PASSWORD: &str = "BASEROW_PASSWORD";

// ============================================================================
// Client Config
// ============================================================================

/// Connection settings of a [`Client`](crate::client::Client)
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the instance (without `/api`)
    #[serde(default)]
    pub url: String,

    /// Database token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Login email for JWT authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Login password for JWT authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Address fields by name instead of `field_<id>`
    #[serde(default = "default_true")]
    pub user_field_names: bool,

    /// Request timeout in seconds; none means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Upper bound of page requests in flight when fetching all rows
    #[serde(default)]
    pub max_concurrent_pages: Option<usize>,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            email: None,
            password: None,
            user_field_names: true,
            timeout_secs: None,
            max_concurrent_pages: None,
            rate_limit: None,
            user_agent: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("user_field_names", &self.user_field_names)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_concurrent_pages", &self.max_concurrent_pages)
            .field("rate_limit", &self.rate_limit)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read `BASEROW_URL`, `BASEROW_TOKEN`, `BASEROW_EMAIL` and `BASEROW_PASSWORD`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable lookup (the environment in [`from_env`](Self::from_env))
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            url: non_empty(ENV_URL).unwrap_or_default(),
            token: non_empty(ENV_TOKEN),
            email: non_empty(ENV_EMAIL),
            password: non_empty(ENV_PASSWORD),
            ..Self::default()
        }
    }

    /// Fill the fields unset here from another config
    #[must_use]
    pub fn or(mut self, fallback: ClientConfig) -> Self {
        if self.url.is_empty() {
            self.url = fallback.url;
        }
        if self.token.is_none() && self.email.is_none() {
            self.token = fallback.token;
            self.email = fallback.email;
            self.password = fallback.password;
        }
        self
    }

    /// Check that the config names an instance and one way to authenticate
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::missing_field("url"));
        }
        url::Url::parse(&self.url)?;
        if self.token.is_some() && (self.email.is_some() || self.password.is_some()) {
            return Err(Error::config(
                "configure either a token or email and password, not both",
            ));
        }
        match (&self.email, &self.password) {
            (Some(_), None) => return Err(Error::missing_field("password")),
            (None, Some(_)) => return Err(Error::missing_field("email")),
            _ => {}
        }
        if self.max_concurrent_pages == Some(0) {
            return Err(Error::config("max_concurrent_pages must be at least 1"));
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }
        Ok(())
    }

    /// The authentication method this config describes
    pub fn auth(&self) -> Result<AuthConfig> {
        match (&self.token, &self.email, &self.password) {
            (Some(token), None, None) => Ok(AuthConfig::token(token.clone())),
            (None, Some(email), Some(password)) => {
                Ok(AuthConfig::jwt(email.clone(), password.clone()))
            }
            (None, None, None) => Err(Error::missing_field("token")),
            _ => {
                self.validate()?;
                Err(Error::config("incomplete credentials"))
            }
        }
    }

    /// Transport settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().base_url(&self.url);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the instance URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Authenticate with a database token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self.config.email = None;
        self.config.password = None;
        self
    }

    /// Authenticate with email and password (JWT)
    pub fn credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.email = Some(email.into());
        self.config.password = Some(password.into());
        self.config.token = None;
        self
    }

    /// Toggle `user_field_names`
    pub fn user_field_names(mut self, enabled: bool) -> Self {
        self.config.user_field_names = enabled;
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    /// Bound the page requests in flight when fetching all rows
    pub fn max_concurrent_pages(mut self, limit: usize) -> Self {
        self.config.max_concurrent_pages = Some(limit);
        self
    }

    /// Set the client-side rate limit
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
