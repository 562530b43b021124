//! Field and table metadata

use super::Client;
use crate::error::Result;
use crate::field::FieldType;
use crate::field_config::FieldConfig;
use crate::http::RequestConfig;
use crate::types::{DatabaseId, FieldId, JsonObject, TableId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// A column as described by the fields endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub id: FieldId,
    pub name: String,
    #[serde(default)]
    pub table_id: Option<TableId>,
    #[serde(default)]
    pub order: Option<i64>,
    /// Column type name, e.g. `link_row`
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub read_only: bool,
    /// Type specific options
    #[serde(flatten)]
    pub options: JsonObject,
}

impl FieldInfo {
    /// The column type, if it is one this crate knows
    pub fn kind(&self) -> Option<FieldType> {
        serde_json::from_value(serde_json::Value::String(self.field_type.clone())).ok()
    }
}

/// A table as described by the tables endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub id: TableId,
    pub name: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub database_id: Option<DatabaseId>,
}

impl Client {
    /// List the fields of a table
    pub async fn list_fields(&self, table_id: TableId) -> Result<Vec<FieldInfo>> {
        self.http()
            .get_json(
                &format!("database/fields/table/{table_id}/"),
                RequestConfig::new(),
            )
            .await
    }

    /// Create a field in a table
    ///
    /// Only available with JWT authentication.
    pub async fn create_field(&self, table_id: TableId, config: &FieldConfig) -> Result<FieldInfo> {
        self.require_jwt("create_field")?;
        config.validate()?;
        let field: FieldInfo = self
            .http()
            .post_json(
                &format!("database/fields/table/{table_id}/"),
                serde_json::to_value(config)?,
            )
            .await?;
        info!("Created field '{}' ({}) in table {}", field.name, field.id, table_id);
        Ok(field)
    }

    /// List the tables of a database
    pub async fn list_database_tables(&self, database_id: DatabaseId) -> Result<Vec<TableInfo>> {
        self.require_jwt("list_database_tables")?;
        self.http()
            .get_json(
                &format!("database/tables/database/{database_id}/"),
                RequestConfig::new(),
            )
            .await
    }

    /// Create an empty table in a database
    ///
    /// Only available with JWT authentication.
    pub async fn create_database_table(
        &self,
        database_id: DatabaseId,
        name: &str,
    ) -> Result<TableInfo> {
        self.require_jwt("create_database_table")?;
        let table: TableInfo = self
            .http()
            .post_json(
                &format!("database/tables/database/{database_id}/"),
                json!({ "name": name }),
            )
            .await?;
        info!("Created table '{}' ({}) in database {}", table.name, table.id, database_id);
        Ok(table)
    }
}
