//! Users and system columns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Baserow user referenced by a cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    /// Reference a user by id
    pub fn from_id(id: u64) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }
}

/// A cell holding several users
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsersField(pub Vec<User>);

impl UsersField {
    /// Ids of the referenced users
    pub fn ids(&self) -> Vec<u64> {
        self.0.iter().filter_map(|user| user.id).collect()
    }
}

/// Collaborators column
pub type MultipleCollaboratorsField = UsersField;

/// User who created the row (read-only)
pub type CreatedBy = User;

/// User who last modified the row (read-only)
pub type LastModifiedBy = User;

/// Creation time of the row (read-only)
pub type CreatedOn = DateTime<Utc>;

/// Last modification time of the row (read-only)
pub type LastModified = DateTime<Utc>;
