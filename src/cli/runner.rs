//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, Commands, FieldsCommand, ListArgs, OutputFormat, RowsCommand, TablesCommand,
    UploadCommand,
};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::types::{JsonObject, JsonValue, OrderBy, PageSize, RowQuery};
use serde::Serialize;
use std::fs;
use std::time::Instant;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = Client::new(&self.client_config()?)?;
        let start = Instant::now();

        match &self.cli.command {
            Commands::Rows(command) => self.rows(&client, command).await?,
            Commands::Fields(FieldsCommand::List { table }) => {
                self.output(&client.list_fields(*table).await?)?;
            }
            Commands::Tables(TablesCommand::List { database }) => {
                self.output(&client.list_database_tables(*database).await?)?;
            }
            Commands::Upload(command) => self.upload(&client, command).await?,
        }

        debug!("Command finished in {:?}", start.elapsed());
        Ok(())
    }

    /// Command-line flags, then the config file, then the environment
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        if let Some(url) = &self.cli.url {
            config.url.clone_from(url);
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
            config.email = None;
            config.password = None;
        }
        let config = config.or(ClientConfig::from_env());
        config.validate()?;
        Ok(config)
    }

    async fn rows(&self, client: &Client, command: &RowsCommand) -> Result<()> {
        match command {
            RowsCommand::List(args) => {
                let query = build_query(args)?;
                let page = if query.size == Some(PageSize::All) {
                    client
                        .list_all_table_rows::<JsonValue>(args.table, &query)
                        .await?
                } else {
                    client.list_table_rows::<JsonValue>(args.table, &query).await?
                };
                self.output(&page)
            }
            RowsCommand::Get { table, row } => {
                let row: JsonValue = client.get_row(*table, *row).await?;
                self.output(&row)
            }
            RowsCommand::Create { table, data } => {
                let row: JsonValue = client.create_row(*table, &parse_object(data)?).await?;
                self.output(&row)
            }
            RowsCommand::Update { table, row, data } => {
                let row: JsonValue = client
                    .update_row(*table, *row, &parse_object(data)?)
                    .await?;
                self.output(&row)
            }
            RowsCommand::Delete { table, rows } => {
                match rows.as_slice() {
                    [row] => client.delete_row(*table, *row).await?,
                    _ => client.delete_rows(*table, rows).await?,
                }
                self.output(&serde_json::json!({ "deleted": rows }))
            }
        }
    }

    async fn upload(&self, client: &Client, command: &UploadCommand) -> Result<()> {
        let file = match command {
            UploadCommand::File { path } => {
                let content = fs::read(path).map_err(|e| {
                    Error::config(format!("Failed to read '{}': {}", path.display(), e))
                })?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| Error::config(format!("'{}' is not a file", path.display())))?;
                client.upload_file(content, &name).await?
            }
            UploadCommand::Url { url } => client.upload_file_via_url(url).await?,
        };
        self.output(&file)
    }

    /// Print a value in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Translate `rows list` arguments into a query
fn build_query(args: &ListArgs) -> Result<RowQuery> {
    let mut query = RowQuery::new();
    if let Some(filter) = &args.filter {
        let filter: Filter = serde_json::from_str(filter)
            .map_err(|e| Error::config(format!("Invalid --filter JSON: {e}")))?;
        query = query.filter(filter);
    }
    if let Some(order_by) = &args.order_by {
        let entries = order_by
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse::<OrderBy>)
            .collect::<Result<Vec<_>>>()?;
        query = query.order_by(entries);
    }
    if let Some(size) = args.size {
        query = query.size(PageSize::try_from(size)?);
    }
    if let Some(page) = args.page {
        if query.size == Some(PageSize::All) {
            return Err(Error::validation(
                "--page cannot be combined with --size -1",
            ));
        }
        query = query.page(page);
    }
    if let Some(search) = &args.search {
        query = query.search(search.clone());
    }
    Ok(query)
}

/// Parse a `--data` argument
fn parse_object(data: &str) -> Result<JsonObject> {
    match serde_json::from_str(data)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(Error::config("--data must be a JSON object")),
    }
}
