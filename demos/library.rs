//! Library demo
//!
//! Declares an `Author` and a `Book` table and walks through creating,
//! querying, linking and updating rows. Expects `BASEROW_URL` plus either
//! `BASEROW_TOKEN` or `BASEROW_EMAIL`/`BASEROW_PASSWORD`. Adjust the table
//! ids in the `Table` impls to your database.
//!
//! ```sh
//! BASEROW_URL=https://baserow.example.com BASEROW_TOKEN=... cargo run --example library
//! ```

use baserow_orm::field::{
    CreatedBy, CreatedOn, FileField, LastModified, LinkField, MultipleCollaboratorsField,
    MultipleSelectField, PendingChanges, SingleSelectField,
};
use baserow_orm::{
    client, ClientConfig, Filter, PageSize, Result, RowId, RowQuery, Table, TableId,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RowId>,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "E-Mail", default)]
    email: Option<String>,
    #[serde(rename = "Phone", default)]
    phone: Option<String>,
}

impl Table for Author {
    const TABLE_ID: TableId = 1420;
    const TABLE_NAME: &'static str = "Author";

    fn row_id(&self) -> Option<RowId> {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Genre {
    Fiction,
    Education,
    Mystery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Keyword {
    Adventure,
    Fiction,
    #[serde(rename = "SQL")]
    Sql,
    Education,
    Tech,
    Mystery,
    Thriller,
    Beginner,
}

#[derive(Debug, Serialize, Deserialize)]
struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RowId>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Author", default)]
    author: LinkField<Author>,
    #[serde(rename = "Genre", default)]
    genre: Option<SingleSelectField<Genre>>,
    #[serde(rename = "Keywords", default)]
    keywords: MultipleSelectField<Keyword>,
    #[serde(rename = "Cover", default)]
    cover: FileField,
    /// Seconds
    #[serde(rename = "Reading Duration", default)]
    reading_duration: Option<f64>,
    #[serde(rename = "Available", default)]
    available: bool,
    #[serde(rename = "Rating", default)]
    rating: u8,
    #[serde(rename = "Created on", default)]
    created_on: Option<CreatedOn>,
    #[serde(rename = "Created by", default)]
    created_by: Option<CreatedBy>,
    #[serde(rename = "Last modified", default)]
    last_modified: Option<LastModified>,
    #[serde(rename = "Collaborators", default)]
    collaborators: MultipleCollaboratorsField,
}

impl Table for Book {
    const TABLE_ID: TableId = 1421;
    const TABLE_NAME: &'static str = "Book";
    const READ_ONLY_FIELDS: &'static [&'static str] =
        &["Created on", "Created by", "Last modified"];

    fn row_id(&self) -> Option<RowId> {
        self.id
    }

    fn pending_fields(&mut self) -> Vec<&mut dyn PendingChanges> {
        vec![&mut self.author, &mut self.cover]
    }
}

async fn populate_authors() -> Result<Vec<Author>> {
    let authors = [
        ("John Doe", 23, "john.doe@example.com", "+1 891 796 3774"),
        ("Jane Smith", 30, "jane.smith@example.com", "+1 303 555 0142"),
        ("Alice Johnson", 37, "alice.johnson@example.com", "+1 404 555 0193"),
    ]
    .into_iter()
    .map(|(name, age, email, phone)| Author {
        id: None,
        name: name.to_string(),
        age,
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
    })
    .collect::<Vec<_>>();
    Author::create_many(&authors).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let client = client::configure_global(&ClientConfig::from_env())?;

    let authors = populate_authors().await?;
    let ids: Vec<RowId> = authors.iter().filter_map(Table::row_id).collect();
    info!("Created {} authors", ids.len());

    let book = Book {
        id: None,
        title: "The Great Adventure".to_string(),
        description: Some("A thrilling tale of adventure and discovery.".to_string()),
        author: LinkField::from_ids(ids.iter().take(2).copied()),
        genre: Some(SingleSelectField::from_value(Genre::Fiction)),
        keywords: MultipleSelectField::from_values([Keyword::Adventure, Keyword::Fiction]),
        cover: FileField::default(),
        reading_duration: Some(8.5 * 3600.0),
        available: true,
        rating: 4,
        created_on: None,
        created_by: None,
        last_modified: None,
        collaborators: MultipleCollaboratorsField::default(),
    };
    let mut book = book.create().await?;
    info!("Created book {:?}", book.id);

    for author in book.author.resolve_cached().await? {
        info!("  written by {} ({})", author.name, author.age);
    }

    book.cover
        .append_file_from_url(
            &client,
            "https://picsum.photos/id/1/400/300",
            Some("Cover.jpg"),
        )
        .await?;
    book.available = false;
    let book = book.update().await?;
    info!("Book now has {} cover file(s)", book.cover.len());

    let query = RowQuery::new()
        .filter(Filter::and().higher_than("Age", "25"))
        .order_by(["-Age"])
        .size(PageSize::All);
    for author in Author::query(query).await? {
        info!("{} is older than 25", author.name);
    }

    Author::delete_by_id(&ids).await?;
    if let Some(id) = book.id {
        Book::delete_by_id(&[id]).await?;
    }
    Ok(())
}
