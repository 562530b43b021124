//! Filter trees for row queries
//!
//! A [`Filter`] combines [`Condition`]s (and nested filters) with a single
//! [`Operator`]. It is sent to the list endpoint as the JSON `filters`
//! query parameter.
//!
//! ```rust
//! use baserow_orm::filter::Filter;
//!
//! let filter = Filter::and()
//!     .higher_than_or_equal("Age", "30")
//!     .lower_than_or_equal("Age", "40");
//! assert_eq!(filter.conditions.len(), 2);
//! ```

use crate::error::Result;
use crate::types::FieldId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a condition compares the field with its value
///
/// Names follow the Baserow UI; the serialized form is the API's filter
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    #[serde(rename = "equal")]
    Equals,
    #[serde(rename = "not_equal")]
    EqualsNot,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "contains_not")]
    DoesNotContain,
    #[serde(rename = "contains_word")]
    ContainWord,
    #[serde(rename = "doesnt_contain_word")]
    DoesNotContainWord,
    #[serde(rename = "length_is_lower_than")]
    LengthIsLowerThan,
    #[serde(rename = "higher_than")]
    HigherThan,
    #[serde(rename = "higher_than_or_equal")]
    HigherThanOrEqual,
    #[serde(rename = "lower_than")]
    LowerThan,
    #[serde(rename = "lower_than_or_equal")]
    LowerThanOrEqual,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "link_row_has")]
    LinkRowHas,
    #[serde(rename = "link_row_has_not")]
    LinkRowHasNot,
    #[serde(rename = "single_select_equal")]
    SingleSelectEqual,
    #[serde(rename = "single_select_not_equal")]
    SingleSelectNotEqual,
    #[serde(rename = "multiple_select_has")]
    MultipleSelectHas,
    #[serde(rename = "multiple_select_has_not")]
    MultipleSelectHasNot,
    #[serde(rename = "empty")]
    IsEmpty,
    #[serde(rename = "not_empty")]
    IsNotEmpty,
}

/// How the items of a filter are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// All items must match
    #[default]
    And,
    /// At least one item must match
    Or,
}

/// Field reference: a name with `user_field_names`, otherwise the numeric id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    Id(FieldId),
    Name(String),
}

impl From<&str> for FieldRef {
    fn from(name: &str) -> Self {
        FieldRef::Name(name.to_string())
    }
}

impl From<String> for FieldRef {
    fn from(name: String) -> Self {
        FieldRef::Name(name)
    }
}

impl From<FieldId> for FieldRef {
    fn from(id: FieldId) -> Self {
        FieldRef::Id(id)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Id(id) => write!(f, "field_{id}"),
            FieldRef::Name(name) => f.write_str(name),
        }
    }
}

/// A single comparison applied to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The field to compare
    pub field: FieldRef,
    /// Comparison mode
    #[serde(rename = "type")]
    pub mode: FilterMode,
    /// Value to compare against
    #[serde(default)]
    pub value: Option<String>,
}

impl Condition {
    /// Create a new condition
    pub fn new(field: impl Into<FieldRef>, mode: FilterMode, value: Option<String>) -> Self {
        Self {
            field: field.into(),
            mode,
            value,
        }
    }
}

/// A filter tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Combination of the items
    #[serde(rename = "filter_type")]
    pub operator: Operator,
    /// Conditions at this level
    #[serde(rename = "filters", default)]
    pub conditions: Vec<Condition>,
    /// Nested sub-filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Filter>,
}

macro_rules! value_condition {
    ($(#[$doc:meta])* $name:ident => $mode:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(self, field: impl Into<FieldRef>, value: impl Into<String>) -> Self {
            self.condition(Condition::new(field, FilterMode::$mode, Some(value.into())))
        }
    };
}

impl Filter {
    /// Empty filter with the given operator
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            conditions: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Empty filter whose items must all match
    pub fn and() -> Self {
        Self::new(Operator::And)
    }

    /// Empty filter of which at least one item must match
    pub fn or() -> Self {
        Self::new(Operator::Or)
    }

    /// Add a condition
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a nested filter
    #[must_use]
    pub fn group(mut self, filter: Filter) -> Self {
        self.groups.push(filter);
        self
    }

    value_condition!(
        /// Field exactly matches the value
        equals => Equals
    );
    value_condition!(
        /// Field does not match the value
        not_equals => EqualsNot
    );
    value_condition!(
        /// Field contains the value
        contains => Contains
    );
    value_condition!(
        /// Field does not contain the value
        does_not_contain => DoesNotContain
    );
    value_condition!(
        /// Field contains the word
        contain_word => ContainWord
    );
    value_condition!(
        /// Field does not contain the word
        does_not_contain_word => DoesNotContainWord
    );
    value_condition!(
        /// Field is shorter than the given length
        length_is_lower_than => LengthIsLowerThan
    );
    value_condition!(higher_than => HigherThan);
    value_condition!(higher_than_or_equal => HigherThanOrEqual);
    value_condition!(lower_than => LowerThan);
    value_condition!(lower_than_or_equal => LowerThanOrEqual);
    value_condition!(
        /// Linked rows include the row with this id
        link_row_has => LinkRowHas
    );
    value_condition!(link_row_has_not => LinkRowHasNot);
    value_condition!(
        /// Selected option id equals the value
        single_select_equal => SingleSelectEqual
    );
    value_condition!(single_select_not_equal => SingleSelectNotEqual);
    value_condition!(multiple_select_has => MultipleSelectHas);
    value_condition!(multiple_select_has_not => MultipleSelectHasNot);

    /// Boolean field has the given state
    #[must_use]
    pub fn boolean(self, field: impl Into<FieldRef>, value: bool) -> Self {
        self.condition(Condition::new(
            field,
            FilterMode::Boolean,
            Some(value.to_string()),
        ))
    }

    /// Field is empty
    #[must_use]
    pub fn empty(self, field: impl Into<FieldRef>) -> Self {
        self.condition(Condition::new(field, FilterMode::IsEmpty, None))
    }

    /// Field is not empty
    #[must_use]
    pub fn not_empty(self, field: impl Into<FieldRef>) -> Self {
        self.condition(Condition::new(field, FilterMode::IsNotEmpty, None))
    }

    /// Check whether the tree holds no condition at any level
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty() || self.groups.iter().any(Filter::has_conditions)
    }

    /// Serialize as the `filters` query parameter
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
