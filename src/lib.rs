// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # baserow-orm
//!
//! A typed client and ORM-style table layer for the Baserow REST API.
//!
//! ## Features
//!
//! - **Typed tables**: Bind serde record structs to tables with the [`Table`] trait
//! - **Queries**: Filter trees, ordering, paging, and fetching every row over
//!   concurrent page requests
//! - **Field values**: Linked rows with a memoized resolver, select options,
//!   files with upload helpers, users and system columns
//! - **Column configs**: Create fields from a typed [`FieldConfig`]
//! - **Auth**: Database tokens, or JWTs exchanged from email and password
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use baserow_orm::{Client, PageSize, RowQuery, Table, Filter};
//!
//! #[tokio::main]
//! async fn main() -> baserow_orm::Result<()> {
//!     let client = Client::with_token("https://baserow.example.com", "db-token")?;
//!     baserow_orm::client::configure_global_client(client)?;
//!
//!     let query = RowQuery::new()
//!         .filter(Filter::and().contains("Title", "Rust"))
//!         .order_by(["-Year"])
//!         .size(PageSize::All);
//!     for book in Book::query(query).await? {
//!         println!("{book:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Table trait                             │
//! │  query()  by_id()  create()  update()  delete()                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │  bound / scoped / global client
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │  Pagination   │  Fields   │ FieldConfig │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Token    │ reqwest   │ probe + plan  │ LinkField │ tagged enum │
//! │ JWT      │ errors    │ ordered fan-  │ Select    │ validation  │
//! │          │ rate limit│ out           │ File/User │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Filter trees for row queries
pub mod filter;

/// Cell values of composite column types
pub mod field;

/// Column configurations for creating fields
pub mod field_config;

/// Token and JWT authentication
pub mod auth;

/// HTTP transport with error mapping and rate limiting
pub mod http;

/// Page planning for fetching every row
pub mod pagination;

/// Baserow client and client resolution
pub mod client;

/// Typed tables
pub mod table;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use field::{
    File, FileField, LinkField, MultipleSelectField, PendingChanges, RowLink, SelectEntry,
    SingleSelectField,
};
pub use field_config::FieldConfig;
pub use filter::{Filter, FilterMode, Operator};
pub use table::Table;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
