//! CLI module
//!
//! Command-line access to a Baserow instance.
//!
//! # Commands
//!
//! - `rows list|get|create|update|delete` - Row operations
//! - `fields list` - Columns of a table
//! - `tables list` - Tables of a database
//! - `upload file|url` - File uploads

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, FieldsCommand, ListArgs, OutputFormat, RowsCommand, TablesCommand,
    UploadCommand,
};
pub use runner::Runner;
