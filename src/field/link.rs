//! Links to rows in another table

use super::PendingChanges;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::RowId;
use futures::future::try_join_all;
use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tokio::sync::OnceCell;
use tracing::debug;

/// A single link to a row, by id and/or primary-field value
///
/// At least one of the two is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLink {
    row_id: Option<RowId>,
    value: Option<String>,
}

impl RowLink {
    /// Create a link, rejecting one without id and value
    pub fn new(row_id: Option<RowId>, value: Option<String>) -> Result<Self> {
        if row_id.is_none() && value.is_none() {
            return Err(Error::missing_id_or_value("RowLink"));
        }
        Ok(Self { row_id, value })
    }

    /// Link by row id
    pub fn from_id(row_id: RowId) -> Self {
        Self {
            row_id: Some(row_id),
            value: None,
        }
    }

    /// Link by the primary-field text of the target row
    pub fn from_value(value: impl Into<String>) -> Self {
        Self {
            row_id: None,
            value: Some(value.into()),
        }
    }

    /// Id of the linked row
    pub fn row_id(&self) -> Option<RowId> {
        self.row_id
    }

    /// Primary-field text of the linked row
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The form Baserow accepts when writing: the id if known, else the text
    pub fn to_api_value(&self) -> Result<Value> {
        match (&self.row_id, &self.value) {
            (Some(id), _) => Ok(Value::from(*id)),
            (None, Some(value)) => Ok(Value::from(value.as_str())),
            (None, None) => Err(Error::missing_id_or_value("RowLink")),
        }
    }
}

impl Serialize for RowLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_api_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRowLink {
    Object {
        #[serde(default)]
        id: Option<RowId>,
        #[serde(default)]
        value: Option<Value>,
    },
    Id(RowId),
    Text(String),
}

impl<'de> Deserialize<'de> for RowLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (row_id, value) = match RawRowLink::deserialize(deserializer)? {
            RawRowLink::Object { id, value } => {
                let value = match value {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s),
                    Some(other) => Some(other.to_string()),
                };
                (id, value)
            }
            RawRowLink::Id(id) => (Some(id), None),
            RawRowLink::Text(text) => (None, Some(text)),
        };
        RowLink::new(row_id, value).map_err(serde::de::Error::custom)
    }
}

/// A link-to-table cell: ordered links to rows of table `T`
///
/// The resolved rows are memoized per field instance by
/// [`resolve_cached`](LinkField::resolve_cached). The cache is never
/// invalidated on its own; call [`clear_cache`](LinkField::clear_cache) or
/// [`refresh`](LinkField::refresh) to drop it.
pub struct LinkField<T> {
    links: Vec<RowLink>,
    cache: OnceCell<Vec<T>>,
    pending: bool,
    _table: PhantomData<fn() -> T>,
}

impl<T> LinkField<T> {
    /// Create a field from links
    pub fn new(links: Vec<RowLink>) -> Self {
        Self {
            links,
            cache: OnceCell::new(),
            pending: false,
            _table: PhantomData,
        }
    }

    /// Links to the given row ids
    pub fn from_ids(ids: impl IntoIterator<Item = RowId>) -> Self {
        Self::new(ids.into_iter().map(RowLink::from_id).collect())
    }

    /// Links to rows by their primary-field text
    pub fn from_values<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(RowLink::from_value).collect())
    }

    /// The links
    pub fn links(&self) -> &[RowLink] {
        &self.links
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Check whether the field links to nothing
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Append a link; the change is sent with the next `update`
    pub fn push(&mut self, link: RowLink) {
        self.links.push(link);
        self.pending = true;
    }

    /// Comma-separated ids, for logs
    pub fn ids_str(&self) -> String {
        self.links
            .iter()
            .map(|link| link.row_id.map_or_else(|| "?".to_string(), |id| id.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check whether resolved rows are cached
    pub fn is_cached(&self) -> bool {
        self.cache.initialized()
    }

    /// Drop the cached rows
    pub fn clear_cache(&mut self) {
        self.cache = OnceCell::new();
    }
}

impl<T: Table> LinkField<T> {
    /// Fetch every linked row through `T`'s client
    pub async fn resolve(&self) -> Result<Vec<T>> {
        let client = T::resolve_client()?;
        self.resolve_with(&client).await
    }

    /// Fetch every linked row with an explicit client
    ///
    /// Links that only carry a primary-field value cannot be resolved.
    pub async fn resolve_with(&self, client: &Client) -> Result<Vec<T>> {
        let ids = self
            .links
            .iter()
            .map(|link| {
                link.row_id.ok_or_else(|| {
                    Error::validation(format!(
                        "cannot resolve link '{}' into {}: only links with a row id can be resolved",
                        link.value.as_deref().unwrap_or_default(),
                        T::TABLE_NAME
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Resolving {} links into {}", ids.len(), T::TABLE_NAME);
        let client = client.with_field_names(true);
        try_join_all(ids.into_iter().map(|id| client.get_row::<T>(T::TABLE_ID, id))).await
    }

    /// Linked rows, fetched on the first call and memoized afterwards
    pub async fn resolve_cached(&self) -> Result<&[T]> {
        if let Some(rows) = self.cache.get() {
            return Ok(rows);
        }
        let client = T::resolve_client()?;
        self.resolve_cached_with(&client).await
    }

    /// Same as [`resolve_cached`](Self::resolve_cached) with an explicit client
    pub async fn resolve_cached_with(&self, client: &Client) -> Result<&[T]> {
        self.cache
            .get_or_try_init(|| self.resolve_with(client))
            .await
            .map(Vec::as_slice)
    }

    /// Drop the cache and resolve again
    pub async fn refresh(&mut self) -> Result<&[T]> {
        self.clear_cache();
        self.resolve_cached().await
    }
}

impl<T> PendingChanges for LinkField<T> {
    fn has_pending_changes(&self) -> bool {
        self.pending
    }

    fn mark_committed(&mut self) {
        self.pending = false;
    }
}

impl<T> Default for LinkField<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Clone for LinkField<T> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            cache: OnceCell::new(),
            pending: self.pending,
            _table: PhantomData,
        }
    }
}

impl<T> PartialEq for LinkField<T> {
    fn eq(&self, other: &Self) -> bool {
        self.links == other.links
    }
}

impl<T> fmt::Debug for LinkField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkField")
            .field("links", &self.links)
            .field("cached", &self.cache.initialized())
            .field("pending", &self.pending)
            .finish()
    }
}

impl<T> Serialize for LinkField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.links.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for LinkField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<RowLink>::deserialize(deserializer).map(Self::new)
    }
}
