//! Baserow client
//!
//! [`Client`] maps typed operations onto the REST endpoints: row CRUD,
//! paginated listing (single page or every page at once), field and table
//! metadata, and file uploads. It is cheap to clone; clones share one
//! HTTP session.
//!
//! # Choosing a client
//!
//! Table records find their client in this order:
//!
//! 1. the client bound to the table (`Table::bound_client`)
//! 2. the client of the current task scope ([`Client::scope`])
//! 3. the process-wide client ([`configure_global`]), which can be set once

mod context;
mod files;
mod rows;
mod schema;

pub use context::{configure_global, configure_global_client, current, global, ClientSlot};
pub use schema::{FieldInfo, TableInfo};

use crate::auth::AuthConfig;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use std::sync::Arc;
use tracing::debug;

/// Client for one Baserow instance
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
    user_field_names: bool,
}

struct Inner {
    http: HttpClient,
    max_concurrent_pages: Option<usize>,
}

impl Client {
    /// Create a client from a configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.http_config(), config.auth()?)?;
        debug!("Created Baserow client for {}", config.url);
        Ok(Self::from_parts(
            http,
            config.user_field_names,
            config.max_concurrent_pages,
        ))
    }

    /// Client authenticating with a database token
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::new(&ClientConfig::builder().url(url).token(token).build())
    }

    /// Client authenticating with user credentials (JWT)
    pub fn with_credentials(
        url: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            &ClientConfig::builder()
                .url(url)
                .credentials(email, password)
                .build(),
        )
    }

    /// Wrap an existing transport
    pub fn from_parts(
        http: HttpClient,
        user_field_names: bool,
        max_concurrent_pages: Option<usize>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                max_concurrent_pages,
            }),
            user_field_names,
        }
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.inner.http
    }

    /// Base URL of the instance
    pub fn base_url(&self) -> &str {
        self.inner.http.base_url()
    }

    /// Whether requests address fields by name unless a query says otherwise
    pub fn user_field_names(&self) -> bool {
        self.user_field_names
    }

    /// A handle on the same session with another field naming
    ///
    /// Typed records always use field names, so the table layer goes
    /// through `with_field_names(true)`.
    pub fn with_field_names(&self, enabled: bool) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            user_field_names: enabled,
        }
    }

    /// Upper bound of concurrent page requests when fetching all rows
    pub fn max_concurrent_pages(&self) -> Option<usize> {
        self.inner.max_concurrent_pages
    }

    /// Check whether this client authenticates with a JWT
    pub fn uses_jwt(&self) -> bool {
        self.inner.http.uses_jwt()
    }

    /// Fail unless the client authenticates with a JWT
    pub(crate) fn require_jwt(&self, operation: &str) -> Result<()> {
        if self.uses_jwt() {
            Ok(())
        } else {
            Err(Error::jwt_required(operation))
        }
    }

    /// Check whether two handles share the same session
    pub fn same_as(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Credentials-free client, for instances behind a proxy that injects auth
    pub fn anonymous(url: impl Into<String>) -> Result<Self> {
        let config = ClientConfig::builder().url(url).build();
        let http = HttpClient::with_auth(config.http_config(), AuthConfig::None)?;
        Ok(Self::from_parts(http, true, None))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("http", &self.inner.http)
            .field("user_field_names", &self.user_field_names)
            .field("max_concurrent_pages", &self.inner.max_concurrent_pages)
            .finish()
    }
}

#[cfg(test)]
mod tests;
