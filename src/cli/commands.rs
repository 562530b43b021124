//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Baserow command-line client
#[derive(Parser, Debug)]
#[command(name = "baserow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the Baserow instance (overrides config and BASEROW_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Database token (overrides config and BASEROW_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read and write rows
    #[command(subcommand)]
    Rows(RowsCommand),

    /// Inspect fields
    #[command(subcommand)]
    Fields(FieldsCommand),

    /// Inspect tables (JWT authentication only)
    #[command(subcommand)]
    Tables(TablesCommand),

    /// Upload files to the user files storage
    #[command(subcommand)]
    Upload(UploadCommand),
}

impl Commands {
    /// Subcommand path as typed, for messages
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Rows(RowsCommand::List(_)) => "rows list",
            Commands::Rows(RowsCommand::Get { .. }) => "rows get",
            Commands::Rows(RowsCommand::Create { .. }) => "rows create",
            Commands::Rows(RowsCommand::Update { .. }) => "rows update",
            Commands::Rows(RowsCommand::Delete { .. }) => "rows delete",
            Commands::Fields(FieldsCommand::List { .. }) => "fields list",
            Commands::Tables(TablesCommand::List { .. }) => "tables list",
            Commands::Upload(UploadCommand::File { .. }) => "upload file",
            Commands::Upload(UploadCommand::Url { .. }) => "upload url",
        }
    }
}

/// Row subcommands
#[derive(Subcommand, Debug)]
pub enum RowsCommand {
    /// List rows of a table
    List(ListArgs),

    /// Fetch one row
    Get {
        #[arg(long)]
        table: u64,
        row: u64,
    },

    /// Create a row from a JSON object
    Create {
        #[arg(long)]
        table: u64,
        #[arg(long)]
        data: String,
    },

    /// Update fields of a row from a JSON object
    Update {
        #[arg(long)]
        table: u64,
        row: u64,
        #[arg(long)]
        data: String,
    },

    /// Delete rows
    Delete {
        #[arg(long)]
        table: u64,
        #[arg(required = true)]
        rows: Vec<u64>,
    },
}

/// Arguments of `rows list`
#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub table: u64,

    /// Filter tree as JSON, e.g. {"filter_type":"AND","filters":[...]}
    #[arg(long)]
    pub filter: Option<String>,

    /// Comma-separated order, `-` prefix for descending (e.g. `Name,-Age`)
    #[arg(long)]
    pub order_by: Option<String>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size (1-200), or -1 for every row
    #[arg(long, allow_hyphen_values = true)]
    pub size: Option<i64>,

    /// Full-text search
    #[arg(long)]
    pub search: Option<String>,
}

/// Field subcommands
#[derive(Subcommand, Debug)]
pub enum FieldsCommand {
    /// List the fields of a table
    List {
        #[arg(long)]
        table: u64,
    },
}

/// Table subcommands
#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    /// List the tables of a database
    List {
        #[arg(long)]
        database: u64,
    },
}

/// Upload subcommands
#[derive(Subcommand, Debug)]
pub enum UploadCommand {
    /// Upload a local file
    File { path: PathBuf },

    /// Let Baserow download a file from a URL
    Url { url: String },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
