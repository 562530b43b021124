//! Authentication module
//!
//! Supports: database tokens (`Authorization: Token ...`) and JWTs obtained
//! by exchanging email and password at `user/token-auth/`
//! (`Authorization: JWT ...`).
//!
//! The `Authenticator` attaches the header and caches the JWT until shortly
//! before it expires.

mod authenticator;
mod types;

pub use authenticator::{jwt_expiry, Authenticator};
pub use types::{AuthConfig, CachedToken};
