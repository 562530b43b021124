//! Tests for the table layer

use super::*;
use crate::field::{CreatedOn, LinkField, RowLink};
use crate::filter::Filter;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RowId>,
    #[serde(rename = "Name")]
    name: String,
}

impl Table for Author {
    const TABLE_ID: TableId = 11;
    const TABLE_NAME: &'static str = "Author";

    fn row_id(&self) -> Option<RowId> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<String>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Author", default)]
    author: LinkField<Author>,
    #[serde(rename = "Created", default)]
    created: Option<CreatedOn>,
}

impl Table for Book {
    const TABLE_ID: TableId = 12;
    const TABLE_NAME: &'static str = "Book";
    const READ_ONLY_FIELDS: &'static [&'static str] = &["Created"];

    fn row_id(&self) -> Option<RowId> {
        self.id
    }

    fn pending_fields(&mut self) -> Vec<&mut dyn PendingChanges> {
        vec![&mut self.author]
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Unconfigured {
    id: Option<RowId>,
}

impl Table for Unconfigured {
    const TABLE_ID: TableId = 0;
    const TABLE_NAME: &'static str = "Unconfigured";

    fn row_id(&self) -> Option<RowId> {
        self.id
    }
}

fn book(title: &str, author_ids: &[RowId]) -> Book {
    Book {
        id: None,
        order: None,
        title: title.to_string(),
        author: LinkField::from_ids(author_ids.iter().copied()),
        created: None,
    }
}

fn client_for(server: &MockServer) -> Client {
    Client::with_token(server.uri(), "db-token").unwrap()
}

#[test]
fn test_write_payload_strips_system_and_read_only_fields() {
    let mut record = book("Dune", &[1, 2]);
    record.id = Some(7);
    record.order = Some("1.00000000000000000000".to_string());

    let payload = record.write_payload().unwrap();
    assert_eq!(
        JsonValue::Object(payload),
        json!({"Title": "Dune", "Author": [1, 2]})
    );
}

#[tokio::test]
async fn test_invalid_declaration() {
    let err = Unconfigured::by_id(1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidTableConfiguration { ref table, .. } if table == "Unconfigured"
    ));
}

#[tokio::test]
async fn test_no_client_available() {
    let err = Author::by_id(1).await.unwrap_err();
    assert!(matches!(err, Error::NoClientAvailable { ref table } if table == "Author"));
}

#[tokio::test]
async fn test_by_id_uses_scoped_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/3/"))
        .and(query_param("user_field_names", "true"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 3, "order": "1", "Name": "Le Guin"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let author = client_for(&server)
        .scope(Author::by_id(3))
        .await
        .unwrap();
    assert_eq!(
        author,
        Author {
            id: Some(3),
            name: "Le Guin".to_string()
        }
    );
}

#[tokio::test]
async fn test_records_use_field_names_with_field_id_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/3/"))
        .and(query_param("user_field_names", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "Name": "Le Guin"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/"))
        .and(query_param("user_field_names", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 3, "Name": "Le Guin"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = crate::config::ClientConfig::builder()
        .url(server.uri())
        .token("db-token")
        .user_field_names(false)
        .build();
    let client = Client::new(&config).unwrap();

    let (author, listed) = client
        .scope(async {
            let resolved = Author::resolve_client()?;
            assert!(resolved.same_as(&client));
            assert!(resolved.user_field_names());
            assert!(!client.user_field_names());
            Ok::<_, Error>((Author::by_id(3).await?, Author::query(RowQuery::new()).await?))
        })
        .await
        .unwrap();
    assert_eq!(author.name, "Le Guin");
    assert_eq!(listed, vec![author]);
}

#[tokio::test]
async fn test_query_all_with_page_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let query = RowQuery::new().size(PageSize::All).page(2);
    let err = client_for(&server)
        .scope(Author::query(query))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_query_single_page() {
    let server = MockServer::start().await;
    let filter = Filter::and().equals("Name", "Le Guin");
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/"))
        .and(query_param("size", "2"))
        .and(query_param("order_by", "-Name"))
        .and(query_param("filters", filter.to_json().unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 5,
            "next": "http://localhost/api/database/rows/table/11/?page=2",
            "previous": null,
            "results": [{"id": 1, "Name": "Le Guin"}, {"id": 4, "Name": "Le Guin"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = RowQuery::new()
        .filter(filter)
        .order_by(["-Name"])
        .size(PageSize::Limit(2));
    let authors = client_for(&server)
        .scope(Author::query(query))
        .await
        .unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[1].id, Some(4));
}

#[tokio::test]
async fn test_query_all_fetches_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/"))
        .and(query_param("size", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 250,
            "results": [{"id": 1, "Name": "a"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    for (page, ids) in [(1, 1..=200), (2, 201..=250)] {
        let results: Vec<_> = ids.map(|i| json!({"id": i, "Name": "a"})).collect();
        Mock::given(method("GET"))
            .and(path("/api/database/rows/table/11/"))
            .and(query_param("size", "200"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"count": 250, "results": results})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let authors = client_for(&server).scope(Author::all()).await.unwrap();
    assert_eq!(authors.len(), 250);
    assert_eq!(authors.last().and_then(Table::row_id), Some(250));
}

#[tokio::test]
async fn test_create_sends_write_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/database/rows/table/12/"))
        .and(body_json(json!({"Title": "Dune", "Author": [1]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "order": "9.00000000000000000000",
            "Title": "Dune",
            "Author": [{"id": 1, "value": "Herbert"}],
            "Created": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .scope(book("Dune", &[1]).create())
        .await
        .unwrap();
    assert_eq!(created.id, Some(9));
    assert_eq!(created.author.links(), &[RowLink::new(Some(1), Some("Herbert".to_string())).unwrap()]);
    assert!(created.created.is_some());
}

#[tokio::test]
async fn test_create_many_uses_batch_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/database/rows/table/11/batch/"))
        .and(body_json(json!({"items": [{"Name": "a"}, {"Name": "b"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 1, "Name": "a"}, {"id": 2, "Name": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = vec![
        Author {
            id: None,
            name: "a".to_string(),
        },
        Author {
            id: None,
            name: "b".to_string(),
        },
    ];
    let created = client_for(&server)
        .scope(Author::create_many(&rows))
        .await
        .unwrap();
    assert_eq!(created.iter().filter_map(Table::row_id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_update_commits_pending_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/database/rows/table/12/5/"))
        .and(body_json(json!({"Title": "Dune", "Author": [1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "Title": "Dune",
            "Author": [{"id": 1, "value": "a"}, {"id": 2, "value": "b"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut record = book("Dune", &[1]);
    record.id = Some(5);
    record.author.push(RowLink::from_id(2));
    assert!(record.author.has_pending_changes());

    let client = client_for(&server);
    let updated = client.scope(record.update()).await.unwrap();
    assert!(!record.author.has_pending_changes());
    assert_eq!(updated.author.len(), 2);
}

#[tokio::test]
async fn test_update_without_row_id() {
    let server = MockServer::start().await;
    let mut record = book("Dune", &[]);
    let err = client_for(&server)
        .scope(record.update())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_update_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/database/rows/table/11/3/"))
        .and(body_json(json!({"Name": "Ursula"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "Name": "Ursula"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = JsonObject::new();
    fields.insert("Name".to_string(), json!("Ursula"));
    let author = client_for(&server)
        .scope(Author::update_fields(3, fields))
        .await
        .unwrap();
    assert_eq!(author.name, "Ursula");
}

#[tokio::test]
async fn test_delete_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/database/rows/table/11/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/database/rows/table/11/batch-delete/"))
        .and(body_json(json!({"items": [4, 5]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .scope(async {
            Author::delete_by_id(&[]).await?;
            Author::delete_by_id(&[3]).await?;
            Author::delete_by_id(&[4, 5]).await
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_record() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/database/rows/table/11/8/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let author = Author {
        id: Some(8),
        name: "x".to_string(),
    };
    client_for(&server).scope(author.delete()).await.unwrap();
}

#[tokio::test]
async fn test_bad_request_surfaces_baserow_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "ERROR_REQUEST_BODY_VALIDATION",
            "detail": {"Name": [{"error": "This field is required.", "code": "required"}]}
        })))
        .mount(&server)
        .await;

    let author = Author {
        id: None,
        name: String::new(),
    };
    let err = client_for(&server)
        .scope(author.create())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.error_code(), Some("ERROR_REQUEST_BODY_VALIDATION"));
}

// ============================================================================
// Bound clients
// ============================================================================

static BOUND: once_cell::sync::OnceCell<Client> = once_cell::sync::OnceCell::new();

#[derive(Debug, Serialize, Deserialize)]
struct Pinned {
    id: RowId,
}

impl Table for Pinned {
    const TABLE_ID: TableId = 13;
    const TABLE_NAME: &'static str = "Pinned";

    fn row_id(&self) -> Option<RowId> {
        Some(self.id)
    }

    fn bound_client() -> Option<Client> {
        BOUND.get().cloned()
    }
}

#[tokio::test]
async fn test_bound_client_wins_over_scope() {
    let bound_server = MockServer::start().await;
    let scoped_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/13/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&bound_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(0)
        .mount(&scoped_server)
        .await;

    BOUND.set(client_for(&bound_server)).unwrap();
    let row = client_for(&scoped_server)
        .scope(Pinned::by_id(1))
        .await
        .unwrap();
    assert_eq!(row.id, 1);
}

// ============================================================================
// Linked rows
// ============================================================================

#[derive(Deserialize)]
struct BookLinks {
    #[serde(rename = "Author")]
    author: LinkField<Author>,
}

#[tokio::test]
async fn test_resolve_cached_fetches_once() {
    let server = MockServer::start().await;
    for (id, name) in [(1, "Pratchett"), (2, "Gaiman")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/database/rows/table/11/{id}/")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id, "Name": name})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let links: BookLinks = serde_json::from_value(json!({
        "Author": [{"id": 1, "value": "Pratchett"}, {"id": 2, "value": "Gaiman"}]
    }))
    .unwrap();
    let client = client_for(&server);

    let first = links.author.resolve_cached_with(&client).await.unwrap();
    let second = links.author.resolve_cached_with(&client).await.unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].name, "Gaiman");
    assert!(links.author.is_cached());
}

#[tokio::test]
async fn test_resolve_cached_through_scope_and_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/database/rows/table/11/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "Name": "a"})))
        .expect(2)
        .mount(&server)
        .await;

    let mut field: LinkField<Author> = LinkField::from_ids([1]);
    let client = client_for(&server);
    client
        .scope(async {
            field.resolve_cached().await?;
            field.clear_cache();
            assert!(!field.is_cached());
            field.refresh().await.map(|rows| rows.len())
        })
        .await
        .unwrap();
    assert!(field.is_cached());
}

#[tokio::test]
async fn test_resolve_link_without_id_fails() {
    let server = MockServer::start().await;
    let field: LinkField<Author> = LinkField::from_values(["Pratchett"]);
    let err = field
        .resolve_with(&client_for(&server))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!field.is_cached());
}
