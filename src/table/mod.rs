//! Typed tables
//!
//! Implement [`Table`] for a serde record struct to bind it to a Baserow
//! table. Field names in the struct (or their `#[serde(rename)]`) must match
//! the column names, as rows are always exchanged with
//! `user_field_names=true`.
//!
//! ```ignore
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Author {
//!     #[serde(default, skip_serializing_if = "Option::is_none")]
//!     id: Option<RowId>,
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//!
//! impl Table for Author {
//!     const TABLE_ID: TableId = 1420;
//!     const TABLE_NAME: &'static str = "Author";
//!
//!     fn row_id(&self) -> Option<RowId> {
//!         self.id
//!     }
//! }
//!
//! let authors = Author::query(RowQuery::new().size(PageSize::All)).await?;
//! ```

use crate::client::{self, Client};
use crate::error::{Error, Result};
use crate::field::PendingChanges;
use crate::types::{JsonObject, JsonValue, PageSize, RowId, RowQuery, TableId};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Keys Baserow manages itself and rejects in write requests
const SYSTEM_KEYS: [&str; 2] = ["id", "order"];

/// A record type stored in one Baserow table
#[async_trait]
pub trait Table: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    /// Id of the table
    const TABLE_ID: TableId;

    /// Human-readable name, used in errors and logs
    const TABLE_NAME: &'static str;

    /// Columns Baserow computes (formulas, created on, ...) that must not be
    /// sent when writing rows
    const READ_ONLY_FIELDS: &'static [&'static str] = &[];

    /// Row id of this record, if it was read from or written to Baserow
    fn row_id(&self) -> Option<RowId>;

    /// Client used for this table instead of the scoped or process-wide one
    fn bound_client() -> Option<Client> {
        None
    }

    /// Field values of this record that may hold uncommitted changes
    fn pending_fields(&mut self) -> Vec<&mut dyn PendingChanges> {
        Vec::new()
    }

    /// Check the table declaration
    fn validate_declaration() -> Result<()> {
        if Self::TABLE_NAME.trim().is_empty() {
            return Err(Error::invalid_table(
                std::any::type_name::<Self>(),
                "TABLE_NAME must not be empty",
            ));
        }
        if Self::TABLE_ID == 0 {
            return Err(Error::invalid_table(
                Self::TABLE_NAME,
                "TABLE_ID must be a positive table id",
            ));
        }
        Ok(())
    }

    /// The client requests for this table go through
    ///
    /// The bound client wins over the task-scoped client, which wins over
    /// the process-wide client. Records address fields by name whatever
    /// the client's own setting.
    fn resolve_client() -> Result<Client> {
        Self::validate_declaration()?;
        let client = match Self::bound_client() {
            Some(client) => client,
            None => client::current(Self::TABLE_NAME)?,
        };
        Ok(client.with_field_names(true))
    }

    /// The record as a write request body
    ///
    /// Drops `id`, `order` and the read-only columns.
    fn write_payload(&self) -> Result<JsonObject> {
        match serde_json::to_value(self)? {
            JsonValue::Object(mut map) => {
                for key in SYSTEM_KEYS.iter().chain(Self::READ_ONLY_FIELDS) {
                    map.remove(*key);
                }
                Ok(map)
            }
            other => Err(Error::validation(format!(
                "{} rows must serialize to a JSON object, got {other}",
                Self::TABLE_NAME
            ))),
        }
    }

    /// Fetch one row by id
    async fn by_id(row_id: RowId) -> Result<Self> {
        let client = Self::resolve_client()?;
        client.get_row(Self::TABLE_ID, row_id).await
    }

    /// Query rows
    ///
    /// With `PageSize::All` every matching row is returned, fetched over as
    /// many pages as needed; a page number cannot be combined with it.
    async fn query(query: RowQuery) -> Result<Vec<Self>> {
        if query.size == Some(PageSize::All) && query.page.is_some() {
            return Err(Error::validation(
                "a specific page cannot be requested together with all rows (size -1)",
            ));
        }
        let client = Self::resolve_client()?;
        let query = query.user_field_names(true);
        let page = if query.size == Some(PageSize::All) {
            client.list_all_table_rows(Self::TABLE_ID, &query).await?
        } else {
            client.list_table_rows(Self::TABLE_ID, &query).await?
        };
        debug!("{} query returned {} rows", Self::TABLE_NAME, page.len());
        Ok(page.results)
    }

    /// Every row of the table
    async fn all() -> Result<Vec<Self>> {
        Self::query(RowQuery::new().size(PageSize::All)).await
    }

    /// Create this record as a new row and return it as stored
    async fn create(&self) -> Result<Self> {
        let client = Self::resolve_client()?;
        let payload = self.write_payload()?;
        client.create_row(Self::TABLE_ID, &payload).await
    }

    /// Create several rows with one request
    async fn create_many(rows: &[Self]) -> Result<Vec<Self>> {
        let client = Self::resolve_client()?;
        let payloads = rows
            .iter()
            .map(Self::write_payload)
            .collect::<Result<Vec<_>>>()?;
        client.create_rows(Self::TABLE_ID, &payloads).await
    }

    /// Write this record to its row and return the row as stored
    ///
    /// Pending field changes count as committed afterwards.
    async fn update(&mut self) -> Result<Self> {
        let row_id = self.row_id().ok_or_else(|| {
            Error::validation(format!(
                "cannot update a {} record without a row id",
                Self::TABLE_NAME
            ))
        })?;
        let client = Self::resolve_client()?;
        let payload = self.write_payload()?;
        let updated = client.update_row(Self::TABLE_ID, row_id, &payload).await?;
        {
            for field in self.pending_fields() {
                field.mark_committed();
            }
        }
        Ok(updated)
    }

    /// Update some fields of a row by id
    async fn update_fields(row_id: RowId, fields: JsonObject) -> Result<Self> {
        let client = Self::resolve_client()?;
        client.update_row(Self::TABLE_ID, row_id, &fields).await
    }

    /// Delete the row of this record
    async fn delete(&self) -> Result<()> {
        let row_id = self.row_id().ok_or_else(|| {
            Error::validation(format!(
                "cannot delete a {} record without a row id",
                Self::TABLE_NAME
            ))
        })?;
        Self::delete_by_id(&[row_id]).await
    }

    /// Delete rows by id
    async fn delete_by_id(row_ids: &[RowId]) -> Result<()> {
        if row_ids.is_empty() {
            return Ok(());
        }
        let client = Self::resolve_client()?;
        match row_ids {
            [row_id] => client.delete_row(Self::TABLE_ID, *row_id).await,
            _ => client.delete_rows(Self::TABLE_ID, row_ids).await,
        }
    }
}

#[cfg(test)]
mod tests;
