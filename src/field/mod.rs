//! Field values that do not map onto plain Rust types
//!
//! Scalar columns (text, numbers, booleans, dates, durations, URLs) use
//! ordinary types in record structs. The types here cover the composite
//! cells: linked rows, select options, files, users and the read-only
//! system columns.
//!
//! # Overview
//!
//! - [`LinkField`] / [`RowLink`] - links to rows of another table, with a
//!   memoized resolver
//! - [`SingleSelectField`] / [`MultipleSelectField`] - options mapped onto a
//!   serde string enum
//! - [`FileField`] / [`File`] - attachments with upload helpers
//! - [`User`] / [`UsersField`] - created-by, last-modified-by, collaborators

mod file;
mod link;
mod select;
mod user;

pub use file::{File, FileField, FileThumbnail, FileUploader};
pub use link::{LinkField, RowLink};
pub use select::{MultipleSelectField, SelectEntry, SingleSelectField};
pub use user::{
    CreatedBy, CreatedOn, LastModified, LastModifiedBy, MultipleCollaboratorsField, User,
    UsersField,
};

use serde::{Deserialize, Serialize};

/// Column types known to Baserow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    LongText,
    LinkRow,
    Boolean,
    Date,
    Rating,
    LastModified,
    LastModifiedBy,
    CreatedOn,
    CreatedBy,
    Duration,
    Url,
    Email,
    File,
    SingleSelect,
    MultipleSelect,
    PhoneNumber,
    Formula,
    Count,
    Rollup,
    Lookup,
    MultipleCollaborators,
    Uuid,
    Autonumber,
    Password,
    Ai,
}

impl FieldType {
    /// Check whether Baserow computes the values of this column itself
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            FieldType::LastModified
                | FieldType::LastModifiedBy
                | FieldType::CreatedOn
                | FieldType::CreatedBy
                | FieldType::Formula
                | FieldType::Count
                | FieldType::Rollup
                | FieldType::Lookup
                | FieldType::Uuid
                | FieldType::Autonumber
        )
    }
}

/// A field value that can hold local changes not yet sent to Baserow
///
/// `Table::update` marks every pending value of the record as committed
/// once the row was written.
pub trait PendingChanges {
    /// Check whether the value was changed locally since the last commit
    fn has_pending_changes(&self) -> bool;

    /// Forget the pending flag after the value was written
    fn mark_committed(&mut self);
}
