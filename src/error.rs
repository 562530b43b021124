//! Error types for baserow-orm
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for baserow-orm
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error(
        "attempted to configure the process-wide client with the URL '{new_url}', \
         even though it was already configured with the URL '{old_url}'"
    )]
    ClientAlreadyConfigured { old_url: String, new_url: String },

    #[error("Invalid configuration of table '{table}': {reason}")]
    InvalidTableConfiguration { table: String, reason: String },

    #[error(
        "no client available for table '{table}': bind a client to the table, \
         run inside Client::scope or configure the process-wide client"
    )]
    NoClientAvailable { table: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("the {operation} operation only works with JWT (email and password) authentication")]
    JwtAuthRequired { operation: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Baserow returned an {error} error with status code {status}: {detail}")]
    BadRequest {
        status: u16,
        error: String,
        detail: Value,
    },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // Value Errors
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{kind} must carry at least one of id and value")]
    MissingIdOrValue { kind: String },

    #[error("field '{field}' has changes that were never committed with update()")]
    UncommittedChanges { field: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a JWT-required error
    pub fn jwt_required(operation: impl Into<String>) -> Self {
        Self::JwtAuthRequired {
            operation: operation.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a missing id/value error
    pub fn missing_id_or_value(kind: impl Into<String>) -> Self {
        Self::MissingIdOrValue { kind: kind.into() }
    }

    /// Create a no-client error
    pub fn no_client(table: impl Into<String>) -> Self {
        Self::NoClientAvailable {
            table: table.into(),
        }
    }

    /// Create an invalid table configuration error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTableConfiguration {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status code carried by request errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::BadRequest { status, .. } | Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short Baserow error code (e.g. `ERROR_REQUEST_BODY_VALIDATION`)
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Error::BadRequest { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    /// Check if this is a client-side validation failure (no request was sent)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::MissingIdOrValue { .. }
        )
    }
}

/// Result type alias for baserow-orm
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
