//! Row operations

use super::Client;
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::pagination::{gather_pages, plan};
use crate::types::{Page, PageSize, RowId, RowQuery, TableId, MAX_PAGE_SIZE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

fn rows_path(table_id: TableId) -> String {
    format!("database/rows/table/{table_id}/")
}

fn row_path(table_id: TableId, row_id: RowId) -> String {
    format!("database/rows/table/{table_id}/{row_id}/")
}

/// Response of the batch create endpoint
#[derive(Deserialize)]
struct BatchItems<T> {
    items: Vec<T>,
}

impl Client {
    fn row_params(&self) -> RequestConfig {
        if self.user_field_names() {
            RequestConfig::new().query("user_field_names", "true")
        } else {
            RequestConfig::new()
        }
    }

    /// Fetch a single page of rows
    ///
    /// `PageSize::All` is rejected; use
    /// [`list_all_table_rows`](Self::list_all_table_rows) to fetch every row.
    pub async fn list_table_rows<T: DeserializeOwned>(
        &self,
        table_id: TableId,
        query: &RowQuery,
    ) -> Result<Page<T>> {
        let params = query.to_params(self.user_field_names())?;
        debug!("Listing rows of table {} ({:?})", table_id, params);
        self.http()
            .get_json(&rows_path(table_id), RequestConfig::new().query_pairs(params))
            .await
    }

    /// Fetch every row matching the query
    ///
    /// A one-row probe learns the total count, then all pages of 200 rows
    /// are requested concurrently and concatenated in page order. The
    /// returned page has no `next`/`previous` links.
    pub async fn list_all_table_rows<T: DeserializeOwned>(
        &self,
        table_id: TableId,
        query: &RowQuery,
    ) -> Result<Page<T>> {
        if query.page.is_some() {
            return Err(Error::validation(
                "a page number cannot be combined with fetching all rows",
            ));
        }

        let mut probe_query = query.clone();
        probe_query.size = Some(PageSize::Limit(1));
        let probe: Page<serde_json::Value> =
            self.list_table_rows(table_id, &probe_query).await?;
        if probe.count == 0 {
            debug!("Table {} has no matching rows", table_id);
            return Ok(Page::empty());
        }

        let pages = plan(probe.count, MAX_PAGE_SIZE)?;
        let results = gather_pages(&pages, self.max_concurrent_pages(), |page| {
            let page_query = query
                .clone()
                .page(page)
                .size(PageSize::Limit(MAX_PAGE_SIZE));
            async move { self.list_table_rows::<T>(table_id, &page_query).await }
        })
        .await?;

        debug!(
            "Fetched {} of {} rows from table {}",
            results.len(),
            probe.count,
            table_id
        );
        Ok(Page {
            count: probe.count,
            next: None,
            previous: None,
            results,
        })
    }

    /// Fetch one row by id
    pub async fn get_row<T: DeserializeOwned>(&self, table_id: TableId, row_id: RowId) -> Result<T> {
        self.http()
            .get_json(&row_path(table_id, row_id), self.row_params())
            .await
    }

    /// Create one row and return it as stored
    pub async fn create_row<T: DeserializeOwned>(
        &self,
        table_id: TableId,
        row: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(row)?;
        self.http()
            .request_json(
                Method::POST,
                &rows_path(table_id),
                self.row_params().json(body),
            )
            .await
    }

    /// Create several rows with one batch request
    ///
    /// Empty input returns an empty list without contacting the server.
    pub async fn create_rows<T: DeserializeOwned, R: Serialize>(
        &self,
        table_id: TableId,
        rows: &[R],
    ) -> Result<Vec<T>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({ "items": serde_json::to_value(rows)? });
        let created: BatchItems<T> = self
            .http()
            .request_json(
                Method::POST,
                &format!("{}batch/", rows_path(table_id)),
                self.row_params().json(body),
            )
            .await?;
        Ok(created.items)
    }

    /// Update the given fields of a row and return the row as stored
    pub async fn update_row<T: DeserializeOwned>(
        &self,
        table_id: TableId,
        row_id: RowId,
        fields: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(fields)?;
        self.http()
            .request_json(
                Method::PATCH,
                &row_path(table_id, row_id),
                self.row_params().json(body),
            )
            .await
    }

    /// Delete one row
    pub async fn delete_row(&self, table_id: TableId, row_id: RowId) -> Result<()> {
        self.http()
            .request::<serde_json::Value>(
                Method::DELETE,
                &row_path(table_id, row_id),
                RequestConfig::new(),
            )
            .await?;
        Ok(())
    }

    /// Delete several rows with one batch request
    ///
    /// Empty input returns immediately without contacting the server.
    pub async fn delete_rows(&self, table_id: TableId, row_ids: &[RowId]) -> Result<()> {
        if row_ids.is_empty() {
            return Ok(());
        }
        self.http()
            .request::<serde_json::Value>(
                Method::POST,
                &format!("{}batch-delete/", rows_path(table_id)),
                RequestConfig::new().json(json!({ "items": row_ids })),
            )
            .await?;
        Ok(())
    }
}
