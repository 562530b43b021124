//! Column configurations
//!
//! [`FieldConfig`] describes a column to create: its name, its type and the
//! options of that type. It serializes to the body of the create-field
//! endpoint, tagged by the `type` key. These types describe columns, not
//! cell values; the values live in [`crate::field`].

mod types;

pub use types::{
    random_color, DateFormat, DateOptions, DurationFormat, FormulaOptions, FormulaType,
    RatingStyle, SelectOptionConfig, TimeFormat,
};

use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::types::TableId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Longest column name Baserow accepts
pub const MAX_NAME_LENGTH: usize = 255;

/// `#rrggbb` or a palette name such as `dark-blue`
static COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{6}|[a-z]+(-[a-z]+)*)$").expect("Invalid color regex")
});

/// Type and options of a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConfig {
    Text {
        name: String,
        #[serde(default)]
        text_default: String,
    },
    LongText {
        name: String,
        #[serde(default)]
        long_text_enable_rich_text: bool,
    },
    Url {
        name: String,
    },
    Email {
        name: String,
    },
    Number {
        name: String,
        #[serde(default)]
        number_decimal_places: u8,
        #[serde(default = "default_true")]
        number_negative: bool,
    },
    Rating {
        name: String,
        #[serde(default = "default_max_rating")]
        max_value: u8,
        #[serde(default)]
        color: String,
        #[serde(default)]
        style: RatingStyle,
    },
    Boolean {
        name: String,
    },
    Date {
        name: String,
        #[serde(flatten)]
        options: DateOptions,
    },
    LastModified {
        name: String,
        #[serde(flatten)]
        options: DateOptions,
    },
    LastModifiedBy {
        name: String,
    },
    CreatedOn {
        name: String,
        #[serde(flatten)]
        options: DateOptions,
    },
    CreatedBy {
        name: String,
    },
    Duration {
        name: String,
        #[serde(default)]
        duration_format: DurationFormat,
    },
    LinkRow {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link_row_table_id: Option<TableId>,
        #[serde(default)]
        has_related_field: bool,
    },
    File {
        name: String,
    },
    SingleSelect {
        name: String,
        #[serde(default)]
        select_options: Vec<SelectOptionConfig>,
    },
    MultipleSelect {
        name: String,
        #[serde(default)]
        select_options: Vec<SelectOptionConfig>,
    },
    PhoneNumber {
        name: String,
    },
    Formula {
        name: String,
        #[serde(flatten)]
        options: FormulaOptions,
    },
    Count {
        name: String,
        #[serde(flatten)]
        options: FormulaOptions,
    },
    Rollup {
        name: String,
        #[serde(flatten)]
        options: FormulaOptions,
    },
    Lookup {
        name: String,
        #[serde(flatten)]
        options: FormulaOptions,
    },
    MultipleCollaborators {
        name: String,
        #[serde(default)]
        notify_user_when_added: bool,
    },
    Uuid {
        name: String,
    },
    Autonumber {
        name: String,
        /// View whose order numbers the existing rows
        #[serde(default, skip_serializing_if = "Option::is_none")]
        view: Option<u64>,
    },
    Password {
        name: String,
    },
    Ai {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ai_generative_ai_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ai_generative_ai_model: Option<String>,
        #[serde(default)]
        ai_prompt: String,
    },
}

fn default_true() -> bool {
    true
}

fn default_max_rating() -> u8 {
    5
}

impl FieldConfig {
    /// A plain text column
    pub fn text(name: impl Into<String>) -> Self {
        FieldConfig::Text {
            name: name.into(),
            text_default: String::new(),
        }
    }

    /// A number column with the given decimal places
    pub fn number(name: impl Into<String>, decimal_places: u8) -> Self {
        FieldConfig::Number {
            name: name.into(),
            number_decimal_places: decimal_places,
            number_negative: true,
        }
    }

    /// A boolean column
    pub fn boolean(name: impl Into<String>) -> Self {
        FieldConfig::Boolean { name: name.into() }
    }

    /// A rating column from 1 to `max_value` stars
    pub fn rating(name: impl Into<String>, max_value: u8) -> Self {
        FieldConfig::Rating {
            name: name.into(),
            max_value,
            color: String::new(),
            style: RatingStyle::default(),
        }
    }

    /// A date column
    pub fn date(name: impl Into<String>, options: DateOptions) -> Self {
        FieldConfig::Date {
            name: name.into(),
            options,
        }
    }

    /// A column linking to rows of another table
    pub fn link_row(name: impl Into<String>, table_id: TableId) -> Self {
        FieldConfig::LinkRow {
            name: name.into(),
            link_row_table_id: Some(table_id),
            has_related_field: false,
        }
    }

    /// A single select column with one option per value
    pub fn single_select<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        FieldConfig::SingleSelect {
            name: name.into(),
            select_options: values.into_iter().map(SelectOptionConfig::new).collect(),
        }
    }

    /// A multiple select column with one option per value
    pub fn multiple_select<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        FieldConfig::MultipleSelect {
            name: name.into(),
            select_options: values.into_iter().map(SelectOptionConfig::new).collect(),
        }
    }

    /// A formula column
    pub fn formula(name: impl Into<String>, formula: impl Into<String>, result: FormulaType) -> Self {
        FieldConfig::Formula {
            name: name.into(),
            options: FormulaOptions::new(formula, result),
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        match self {
            FieldConfig::Text { name, .. }
            | FieldConfig::LongText { name, .. }
            | FieldConfig::Url { name }
            | FieldConfig::Email { name }
            | FieldConfig::Number { name, .. }
            | FieldConfig::Rating { name, .. }
            | FieldConfig::Boolean { name }
            | FieldConfig::Date { name, .. }
            | FieldConfig::LastModified { name, .. }
            | FieldConfig::LastModifiedBy { name }
            | FieldConfig::CreatedOn { name, .. }
            | FieldConfig::CreatedBy { name }
            | FieldConfig::Duration { name, .. }
            | FieldConfig::LinkRow { name, .. }
            | FieldConfig::File { name }
            | FieldConfig::SingleSelect { name, .. }
            | FieldConfig::MultipleSelect { name, .. }
            | FieldConfig::PhoneNumber { name }
            | FieldConfig::Formula { name, .. }
            | FieldConfig::Count { name, .. }
            | FieldConfig::Rollup { name, .. }
            | FieldConfig::Lookup { name, .. }
            | FieldConfig::MultipleCollaborators { name, .. }
            | FieldConfig::Uuid { name }
            | FieldConfig::Autonumber { name, .. }
            | FieldConfig::Password { name }
            | FieldConfig::Ai { name, .. } => name,
        }
    }

    /// Column type
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldConfig::Text { .. } => FieldType::Text,
            FieldConfig::LongText { .. } => FieldType::LongText,
            FieldConfig::Url { .. } => FieldType::Url,
            FieldConfig::Email { .. } => FieldType::Email,
            FieldConfig::Number { .. } => FieldType::Number,
            FieldConfig::Rating { .. } => FieldType::Rating,
            FieldConfig::Boolean { .. } => FieldType::Boolean,
            FieldConfig::Date { .. } => FieldType::Date,
            FieldConfig::LastModified { .. } => FieldType::LastModified,
            FieldConfig::LastModifiedBy { .. } => FieldType::LastModifiedBy,
            FieldConfig::CreatedOn { .. } => FieldType::CreatedOn,
            FieldConfig::CreatedBy { .. } => FieldType::CreatedBy,
            FieldConfig::Duration { .. } => FieldType::Duration,
            FieldConfig::LinkRow { .. } => FieldType::LinkRow,
            FieldConfig::File { .. } => FieldType::File,
            FieldConfig::SingleSelect { .. } => FieldType::SingleSelect,
            FieldConfig::MultipleSelect { .. } => FieldType::MultipleSelect,
            FieldConfig::PhoneNumber { .. } => FieldType::PhoneNumber,
            FieldConfig::Formula { .. } => FieldType::Formula,
            FieldConfig::Count { .. } => FieldType::Count,
            FieldConfig::Rollup { .. } => FieldType::Rollup,
            FieldConfig::Lookup { .. } => FieldType::Lookup,
            FieldConfig::MultipleCollaborators { .. } => FieldType::MultipleCollaborators,
            FieldConfig::Uuid { .. } => FieldType::Uuid,
            FieldConfig::Autonumber { .. } => FieldType::Autonumber,
            FieldConfig::Password { .. } => FieldType::Password,
            FieldConfig::Ai { .. } => FieldType::Ai,
        }
    }

    /// Check the constraints Baserow enforces before sending the config
    pub fn validate(&self) -> Result<()> {
        let name = self.name();
        if name.trim().is_empty() {
            return Err(Error::validation("field name must not be empty"));
        }
        check_length("field name", name, MAX_NAME_LENGTH)?;

        match self {
            FieldConfig::Text { text_default, .. } => {
                check_length("text_default", text_default, MAX_NAME_LENGTH)
            }
            FieldConfig::Rating {
                max_value, color, ..
            } => {
                if !(1..=10).contains(max_value) {
                    return Err(Error::validation(format!(
                        "rating max_value must be between 1 and 10, got {max_value}"
                    )));
                }
                if color.is_empty() {
                    Ok(())
                } else {
                    check_color(color)
                }
            }
            FieldConfig::Date { options, .. }
            | FieldConfig::LastModified { options, .. }
            | FieldConfig::CreatedOn { options, .. } => options
                .date_force_timezone
                .as_deref()
                .map_or(Ok(()), |tz| check_length("date_force_timezone", tz, 255)),
            FieldConfig::SingleSelect { select_options, .. }
            | FieldConfig::MultipleSelect { select_options, .. } => {
                for option in select_options {
                    check_length("select option value", &option.value, MAX_NAME_LENGTH)?;
                    check_color(&option.color)?;
                }
                Ok(())
            }
            FieldConfig::Formula { options, .. }
            | FieldConfig::Count { options, .. }
            | FieldConfig::Rollup { options, .. }
            | FieldConfig::Lookup { options, .. } => {
                if options.formula.trim().is_empty() {
                    return Err(Error::validation(format!(
                        "field '{name}' needs a formula"
                    )));
                }
                if options.array_formula_type == Some(FormulaType::Array) {
                    return Err(Error::validation("arrays cannot contain arrays"));
                }
                Ok(())
            }
            FieldConfig::Ai {
                ai_generative_ai_type,
                ai_generative_ai_model,
                ..
            } => {
                for value in [ai_generative_ai_type, ai_generative_ai_model]
                    .into_iter()
                    .flatten()
                {
                    check_length("AI setting", value, 32)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn check_length(what: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::validation(format!(
            "{what} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

fn check_color(color: &str) -> Result<()> {
    if COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        Err(Error::validation(format!("invalid color '{color}'")))
    }
}
