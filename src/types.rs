//! Common types used throughout baserow-orm
//!
//! This module contains shared type definitions, type aliases,
//! and the query parameters accepted by the row list endpoint.

use crate::error::{Error, Result};
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Identifier of a row, unique within its table
pub type RowId = u64;

/// Identifier of a table
pub type TableId = u64;

/// Identifier of a database (application)
pub type DatabaseId = u64;

/// Identifier of a field (column)
pub type FieldId = u64;

// ============================================================================
// Paging
// ============================================================================

/// Maximum number of rows Baserow returns for a single list request
pub const MAX_PAGE_SIZE: u32 = 200;

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of rows matching the query (over all pages)
    pub count: u64,
    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any
    #[serde(default)]
    pub previous: Option<String>,
    /// Rows on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// A page without any rows
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    /// Number of rows on this page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check whether this page carries no rows
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Requested page size
///
/// `All` corresponds to Baserow-ORM's `size = -1`: every matching row,
/// fetched over as many pages as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// At most this many rows (1..=200)
    Limit(u32),
    /// Resolve paging and return every row
    All,
}

impl PageSize {
    /// The numeric value sent as `size`, or `None` for `All`
    pub fn limit(self) -> Option<u32> {
        match self {
            PageSize::Limit(n) => Some(n),
            PageSize::All => None,
        }
    }
}

impl TryFrom<i64> for PageSize {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(PageSize::All),
            1..=200 => Ok(PageSize::Limit(value as u32)),
            _ => Err(Error::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE} or -1 for all rows, got {value}"
            ))),
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Sort direction of an order-by entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// A-Z, 0-9
    #[default]
    Ascending,
    /// Z-A, 9-0
    Descending,
}

/// A single order-by entry
///
/// Parsed from `"Name"`, `"+Name"` or `"-Name"`; a leading `-` sorts
/// descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field name (or `field_<id>`)
    pub field: String,
    /// Sort direction
    pub direction: Direction,
}

impl OrderBy {
    /// Ascending order on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Descending order on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Render a list of entries as the comma-joined `order_by` parameter
    pub fn join(entries: &[OrderBy]) -> String {
        entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}

impl FromStr for OrderBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (direction, field) = if let Some(rest) = s.strip_prefix('-') {
            (Direction::Descending, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (Direction::Ascending, rest)
        } else {
            (Direction::Ascending, s)
        };
        if field.is_empty() {
            return Err(Error::validation(format!("empty order_by entry '{s}'")));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl From<&str> for OrderBy {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| OrderBy::asc(s))
    }
}

// ============================================================================
// Row Query
// ============================================================================

/// Parameters of a row list request
#[derive(Debug, Clone)]
pub struct RowQuery {
    /// Address fields by name instead of `field_<id>`; the client's
    /// setting applies when unset
    pub user_field_names: Option<bool>,
    /// Optional filter tree
    pub filter: Option<Filter>,
    /// Ordering
    pub order_by: Vec<OrderBy>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Page size
    pub size: Option<PageSize>,
    /// Full-text search term
    pub search: Option<String>,
}

impl Default for RowQuery {
    fn default() -> Self {
        Self {
            user_field_names: None,
            filter: None,
            order_by: Vec::new(),
            page: None,
            size: None,
            search: None,
        }
    }
}

impl RowQuery {
    /// Create a new query
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `user_field_names`
    #[must_use]
    pub fn user_field_names(mut self, enabled: bool) -> Self {
        self.user_field_names = Some(enabled);
        self
    }

    /// Set the filter tree
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the filter tree from an option
    #[must_use]
    pub fn maybe_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// Append order-by entries
    #[must_use]
    pub fn order_by<I, O>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OrderBy>,
    {
        self.order_by.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Set the page number
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn size(mut self, size: PageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the search term
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Build the query parameters for a single page request
    ///
    /// `default_field_names` is used when the query leaves
    /// `user_field_names` unset. Fails for `PageSize::All`, which only the
    /// aggregating entry point understands.
    pub fn to_params(&self, default_field_names: bool) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();
        if self.user_field_names.unwrap_or(default_field_names) {
            params.push(("user_field_names".to_string(), "true".to_string()));
        }
        if let Some(filter) = &self.filter {
            params.push(("filters".to_string(), filter.to_json()?));
        }
        if !self.order_by.is_empty() {
            params.push(("order_by".to_string(), OrderBy::join(&self.order_by)));
        }
        if let Some(page) = self.page {
            if page == 0 {
                return Err(Error::validation("page numbers start at 1"));
            }
            params.push(("page".to_string(), page.to_string()));
        }
        match self.size {
            Some(PageSize::Limit(n)) if n == 0 || n > MAX_PAGE_SIZE => {
                return Err(Error::validation(format!(
                    "page size must be between 1 and {MAX_PAGE_SIZE}, got {n}"
                )));
            }
            Some(PageSize::Limit(n)) => params.push(("size".to_string(), n.to_string())),
            Some(PageSize::All) => {
                return Err(Error::validation(
                    "size -1 is only valid when fetching all rows",
                ));
            }
            None => {}
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        Ok(params)
    }
}
