//! Tests for the Baserow client

use super::*;
use crate::field::{FileField, PendingChanges};
use crate::field_config::FieldConfig;
use crate::http::RateLimiterConfig;
use crate::types::{Page, PageSize, RowQuery};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{
    body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROWS_PATH: &str = "/api/database/rows/table/7/";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Row {
    id: u64,
    #[serde(rename = "Name")]
    name: String,
}

fn client_for(server: &MockServer) -> Client {
    Client::with_token(server.uri(), "db-token").unwrap()
}

fn rows(range: std::ops::RangeInclusive<u64>) -> Vec<Value> {
    range
        .map(|i| json!({"id": i, "Name": format!("row {i}")}))
        .collect()
}

async fn mount_probe(server: &MockServer, count: u64) {
    let first = if count == 0 { vec![] } else { rows(1..=1) };
    Mock::given(method("GET"))
        .and(path(ROWS_PATH))
        .and(query_param("size", "1"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"count": count, "results": first})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, count: u64, page: u64, delay: Duration) {
    let start = (page - 1) * 200 + 1;
    let end = (page * 200).min(count);
    Mock::given(method("GET"))
        .and(path(ROWS_PATH))
        .and(query_param("size", "200"))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"count": count, "results": rows(start..=end)}))
                .set_delay(delay),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Fetching all rows
// ============================================================================

#[test_case(0, 0 ; "empty table")]
#[test_case(1, 1 ; "single row")]
#[test_case(200, 1 ; "one full page")]
#[test_case(201, 2 ; "one row over a page")]
#[test_case(400, 2 ; "two full pages")]
#[tokio::test]
async fn test_list_all_rows(count: u64, pages: u64) {
    let server = MockServer::start().await;
    mount_probe(&server, count).await;
    for page in 1..=pages {
        mount_page(&server, count, page, Duration::ZERO).await;
    }
    if pages == 0 {
        Mock::given(query_param("size", "200"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
    }

    let page: Page<Row> = client_for(&server)
        .list_all_table_rows(7, &RowQuery::new())
        .await
        .unwrap();

    assert_eq!(page.count, count);
    assert_eq!(page.results.len() as u64, count);
    let ids: Vec<u64> = page.results.iter().map(|row| row.id).collect();
    assert_eq!(ids, (1..=count).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_list_all_rows_keeps_page_order() {
    let server = MockServer::start().await;
    mount_probe(&server, 450).await;
    mount_page(&server, 450, 1, Duration::from_millis(300)).await;
    mount_page(&server, 450, 2, Duration::from_millis(100)).await;
    mount_page(&server, 450, 3, Duration::ZERO).await;

    let page: Page<Row> = client_for(&server)
        .list_all_table_rows(7, &RowQuery::new())
        .await
        .unwrap();

    let ids: Vec<u64> = page.results.iter().map(|row| row.id).collect();
    assert_eq!(ids, (1..=450).collect::<Vec<_>>());
    assert_eq!(page.next, None);
}

#[tokio::test]
async fn test_list_all_rows_forwards_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROWS_PATH))
        .and(query_param("search", "row"))
        .and(query_param("order_by", "-Name"))
        .and(query_param("user_field_names", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"count": 1, "results": rows(1..=1)})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let query = RowQuery::new().search("row").order_by(["-Name"]);
    let page: Page<Row> = client_for(&server)
        .list_all_table_rows(7, &query)
        .await
        .unwrap();
    assert_eq!(page.results.len(), 1);
}

#[tokio::test]
async fn test_list_all_rows_with_bounded_concurrency() {
    let server = MockServer::start().await;
    mount_probe(&server, 1000).await;
    for page in 1..=5 {
        mount_page(&server, 1000, page, Duration::from_millis(10)).await;
    }
    let config = ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .max_concurrent_pages(2)
        .build();
    let client = Client::new(&config).unwrap();
    assert_eq!(client.max_concurrent_pages(), Some(2));

    let page: Page<Row> = client.list_all_table_rows(7, &RowQuery::new()).await.unwrap();
    assert_eq!(page.results.len(), 1000);
    assert_eq!(page.results[999].id, 1000);
}

#[tokio::test]
async fn test_list_all_rows_respects_rate_limit() {
    let server = MockServer::start().await;
    mount_probe(&server, 800).await;
    for page in 1..=4 {
        mount_page(&server, 800, page, Duration::ZERO).await;
    }
    let config = ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .rate_limit(RateLimiterConfig::new(20, 2))
        .build();
    let client = Client::new(&config).unwrap();
    assert!(client.http().has_rate_limiter());

    let start = std::time::Instant::now();
    let page: Page<Row> = client.list_all_table_rows(7, &RowQuery::new()).await.unwrap();

    assert_eq!(page.results.len(), 800);
    // Probe plus four pages: three requests wait for a permit, 50ms apart
    assert!(start.elapsed() >= Duration::from_millis(130));
}

#[tokio::test]
async fn test_list_all_rows_fails_when_a_page_fails() {
    let server = MockServer::start().await;
    mount_probe(&server, 300).await;
    mount_page(&server, 300, 1, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_all_table_rows::<Row>(7, &RowQuery::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_list_all_rows_rejects_unplannable_count() {
    let server = MockServer::start().await;
    mount_probe(&server, u64::MAX).await;
    Mock::given(method("GET"))
        .and(query_param("size", "200"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_all_table_rows::<Row>(7, &RowQuery::new())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_list_all_rows_rejects_page() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .list_all_table_rows::<Row>(7, &RowQuery::new().page(2))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Single pages and rows
// ============================================================================

#[tokio::test]
async fn test_list_table_rows_rejects_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_table_rows::<Row>(7, &RowQuery::new().size(PageSize::All))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_get_row_without_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/7/3/"))
        .and(query_param_is_missing("user_field_names"))
        .and(header("Authorization", "Token db-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "field_51": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .user_field_names(false)
        .build();
    let row: Value = Client::new(&config).unwrap().get_row(7, 3).await.unwrap();
    assert_eq!(row["field_51"], "x");
}

#[tokio::test]
async fn test_list_rows_follow_client_field_name_setting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROWS_PATH))
        .and(query_param_is_missing("user_field_names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 3, "field_51": "x"}]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .user_field_names(false)
        .build();
    let client = Client::new(&config).unwrap();

    let page: Page<Value> = client.list_table_rows(7, &RowQuery::new()).await.unwrap();
    assert_eq!(page.results[0]["field_51"], "x");
    // Probe plus one page
    let all: Page<Value> = client.list_all_table_rows(7, &RowQuery::new()).await.unwrap();
    assert_eq!(all.results.len(), 1);
}

#[tokio::test]
async fn test_list_rows_query_overrides_client_field_name_setting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROWS_PATH))
        .and(query_param("user_field_names", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"count": 1, "results": rows(1..=1)})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .user_field_names(false)
        .build();
    let page: Page<Row> = Client::new(&config)
        .unwrap()
        .list_table_rows(7, &RowQuery::new().user_field_names(true))
        .await
        .unwrap();
    assert_eq!(page.results[0].name, "row 1");
}

#[tokio::test]
async fn test_get_row_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "ERROR_ROW_DOES_NOT_EXIST",
            "detail": "The row 3 does not exist."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_row::<Row>(7, 3).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_create_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROWS_PATH))
        .and(query_param("user_field_names", "true"))
        .and(body_json(json!({"Name": "new"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 10, "Name": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let row: Row = client_for(&server)
        .create_row(7, &json!({"Name": "new"}))
        .await
        .unwrap();
    assert_eq!(row.id, 10);
}

#[tokio::test]
async fn test_empty_batches_send_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created: Vec<Row> = client.create_rows::<Row, Value>(7, &[]).await.unwrap();
    assert!(created.is_empty());
    client.delete_rows(7, &[]).await.unwrap();
}

#[tokio::test]
async fn test_batch_operations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/database/rows/table/7/batch/"))
        .and(body_json(json!({"items": [{"Name": "a"}, {"Name": "b"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1, "Name": "a"}, {"id": 2, "Name": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/database/rows/table/7/batch-delete/"))
        .and(body_json(json!({"items": [1, 2]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created: Vec<Row> = client
        .create_rows(7, &[json!({"Name": "a"}), json!({"Name": "b"})])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    client.delete_rows(7, &[1, 2]).await.unwrap();
}

#[tokio::test]
async fn test_update_and_delete_row() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/database/rows/table/7/4/"))
        .and(body_json(json!({"Name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "Name": "renamed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/database/rows/table/7/4/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let row: Row = client
        .update_row(7, 4, &json!({"Name": "renamed"}))
        .await
        .unwrap();
    assert_eq!(row.name, "renamed");
    client.delete_row(7, 4).await.unwrap();
}

// ============================================================================
// Fields and tables
// ============================================================================

async fn jwt_client(server: &MockServer) -> Client {
    Mock::given(method("POST"))
        .and(path("/api/user/token-auth/"))
        .and(body_json(json!({"email": "me@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "header.payload.signature",
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(server)
        .await;
    Client::with_credentials(server.uri(), "me@example.com", "pw").unwrap()
}

#[tokio::test]
async fn test_list_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/fields/table/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 51, "table_id": 7, "name": "Name", "order": 0, "type": "text", "primary": true, "text_default": ""},
            {"id": 52, "table_id": 7, "name": "Score", "order": 1, "type": "some_future_type"}
        ])))
        .mount(&server)
        .await;

    let fields = client_for(&server).list_fields(7).await.unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].kind(), Some(crate::field::FieldType::Text));
    assert!(fields[0].primary);
    assert_eq!(fields[0].options.get("text_default"), Some(&json!("")));
    assert_eq!(fields[1].kind(), None);
}

#[tokio::test]
async fn test_create_field_requires_jwt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_field(7, &FieldConfig::text("Notes"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::JwtAuthRequired { ref operation } if operation == "create_field"));
}

#[tokio::test]
async fn test_create_field_with_jwt() {
    let server = MockServer::start().await;
    let client = jwt_client(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/database/fields/table/7/"))
        .and(header("Authorization", "JWT header.payload.signature"))
        .and(body_json(json!({"type": "boolean", "name": "Done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 60, "table_id": 7, "name": "Done", "type": "boolean"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.uses_jwt());
    let field = client
        .create_field(7, &FieldConfig::boolean("Done"))
        .await
        .unwrap();
    assert_eq!(field.id, 60);
}

#[tokio::test]
async fn test_create_field_validates_first() {
    let server = MockServer::start().await;
    let client = Client::with_credentials(server.uri(), "me@example.com", "pw").unwrap();
    let err = client
        .create_field(7, &FieldConfig::rating("Stars", 12))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_database_tables() {
    let server = MockServer::start().await;
    let client = jwt_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/database/tables/database/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Books", "order": 1, "database_id": 3}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/database/tables/database/3/"))
        .and(body_json(json!({"name": "Authors"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "name": "Authors", "order": 2, "database_id": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tables = client.list_database_tables(3).await.unwrap();
    assert_eq!(tables[0].name, "Books");
    let created = client.create_database_table(3, "Authors").await.unwrap();
    assert_eq!(created.id, 8);
}

// ============================================================================
// Files
// ============================================================================

fn uploaded(name: &str) -> Value {
    json!({
        "url": format!("https://files.example/{name}"),
        "thumbnails": null,
        "name": name,
        "size": 11,
        "mime_type": "text/plain",
        "is_image": false,
        "image_width": null,
        "image_height": null,
        "uploaded_at": "2024-05-01T10:00:00.000000Z",
        "original_name": "notes.txt"
    })
}

#[tokio::test]
async fn test_upload_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user-files/upload-file/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uploaded("abc_notes.txt")))
        .expect(1)
        .mount(&server)
        .await;

    let file = client_for(&server)
        .upload_file(b"hello world".to_vec(), "notes.txt")
        .await
        .unwrap();
    assert_eq!(file.name, "abc_notes.txt");
    assert_eq!(file.original_name.as_deref(), Some("notes.txt"));
    assert_eq!(file.size, Some(11));

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_file_field_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user-files/upload-via-url/"))
        .and(body_json(json!({"url": "https://example.com/notes.txt"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(uploaded("def_notes.txt")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut field = FileField::from_url(&client, "https://example.com/notes.txt")
        .await
        .unwrap();
    assert_eq!(field.len(), 1);
    assert!(field.has_pending_changes());
    field.mark_committed();
}

// ============================================================================
// Client resolution
// ============================================================================

#[test]
fn test_slot_configures_once() {
    let slot = ClientSlot::new();
    assert!(!slot.is_configured());

    let first = Client::with_token("https://a.example", "t").unwrap();
    let second = Client::with_token("https://b.example", "t").unwrap();
    slot.configure(first.clone()).unwrap();

    let err = slot.configure(second).unwrap_err();
    match err {
        Error::ClientAlreadyConfigured { old_url, new_url } => {
            assert_eq!(old_url, "https://a.example");
            assert_eq!(new_url, "https://b.example");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(slot.get().unwrap().same_as(&first));
}

#[tokio::test]
async fn test_scope_sets_current_client() {
    let client = Client::with_token("https://scoped.example", "t").unwrap();
    let inner = client
        .scope(async { current("Anything").unwrap() })
        .await;
    assert!(inner.same_as(&client));
}

#[tokio::test]
async fn test_nested_scopes() {
    let outer = Client::with_token("https://outer.example", "t").unwrap();
    let inner = Client::with_token("https://inner.example", "t").unwrap();
    let urls = outer
        .scope(async {
            let nested = inner
                .scope(async { current("T").unwrap().base_url().to_string() })
                .await;
            (nested, current("T").unwrap().base_url().to_string())
        })
        .await;
    assert_eq!(
        urls,
        (
            "https://inner.example".to_string(),
            "https://outer.example".to_string()
        )
    );
}

#[test]
fn test_new_rejects_invalid_config() {
    let err = Client::new(&ClientConfig::default()).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));

    let config = ClientConfig::builder().url("https://b.example").build();
    assert!(Client::new(&config).is_err());
}
