//! Auth configuration types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication (only useful against mock servers)
    #[default]
    None,

    /// Database token created in the Baserow settings
    Token {
        /// The token value
        token: String,
    },

    /// User credentials, exchanged for a JWT
    Jwt {
        /// Login email
        email: String,
        /// Login password
        password: String,
    },
}

impl AuthConfig {
    /// Database token authentication
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
        }
    }

    /// JWT authentication from user credentials
    pub fn jwt(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Jwt {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check whether this configuration produces JWTs
    pub fn is_jwt(&self) -> bool {
        matches!(self, Self::Jwt { .. })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
            Self::Jwt { email, .. } => f
                .debug_struct("Jwt")
                .field("email", email)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
