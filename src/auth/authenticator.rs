//! Authenticator implementation
//!
//! Applies the Authorization header to requests and manages the JWT cache.

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached JWT
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
    /// Full URL of the credential exchange endpoint
    token_url: String,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig, token_url: impl Into<String>) -> Self {
        Self::with_client(config, Client::new(), token_url)
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client, token_url: impl Into<String>) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
            token_url: token_url.into(),
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Token { token } => Ok(req.header("Authorization", format!("Token {token}"))),
            AuthConfig::Jwt { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.header("Authorization", format!("JWT {token}")))
            }
        }
    }

    /// Get a valid JWT, requesting a new one if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_jwt().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Exchange the configured credentials for a JWT
    async fn fetch_jwt(&self) -> Result<CachedToken> {
        let AuthConfig::Jwt { email, password } = &self.config else {
            return Err(Error::auth("Token refresh not supported for this auth type"));
        };

        debug!("Requesting JWT from {}", self.token_url);
        let response = self
            .http_client
            .post(&self.token_url)
            .json(&TokenAuthRequest { email, password })
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("Login request failed with status {status}: {body}"),
            });
        }

        let body: TokenAuthResponse = response.json().await.map_err(Error::Http)?;
        let token = body
            .access_token
            .or(body.token)
            .ok_or_else(|| Error::auth("token-auth response carried no access token"))?;

        let expires_at = jwt_expiry(&token);
        info!("Obtained JWT for {email}, expires at {:?}", expires_at);
        Ok(CachedToken::new(token, expires_at))
    }

    /// Clear the cached token (forces a new credential exchange)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Check whether requests carry a JWT
    pub fn is_jwt(&self) -> bool {
        self.config.is_jwt()
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// Read the `exp` claim of a JWT without verifying its signature
///
/// The signing secret belongs to the server; the claim is only used to
/// decide when to request a fresh token.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp?, 0)
}

/// Body of the credential exchange request
#[derive(Debug, Serialize)]
struct TokenAuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response of `user/token-auth/`
#[derive(Debug, Deserialize)]
struct TokenAuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    /// Field name used by older Baserow versions
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<i64>,
}
