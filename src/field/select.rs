//! Single and multiple select cells
//!
//! Options map onto a string enum deriving serde's `Serialize` and
//! `Deserialize`, with `#[serde(rename = "...")]` naming the option text
//! used in Baserow.

use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chosen select option, by id and/or value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEntry<E> {
    id: Option<u64>,
    value: Option<E>,
    color: Option<String>,
}

/// A single select cell
pub type SingleSelectField<E> = SelectEntry<E>;

impl<E> SelectEntry<E> {
    /// Create an entry, rejecting one without id and value
    pub fn new(id: Option<u64>, value: Option<E>) -> Result<Self> {
        if id.is_none() && value.is_none() {
            return Err(Error::missing_id_or_value("SelectEntry"));
        }
        Ok(Self {
            id,
            value,
            color: None,
        })
    }

    /// Select an option by its value
    pub fn from_value(value: E) -> Self {
        Self {
            id: None,
            value: Some(value),
            color: None,
        }
    }

    /// Select an option by its id
    pub fn from_id(id: u64) -> Self {
        Self {
            id: Some(id),
            value: None,
            color: None,
        }
    }

    /// Option id
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Option value
    pub fn value(&self) -> Option<&E> {
        self.value.as_ref()
    }

    /// Option color as reported by Baserow
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Switch to another option
    ///
    /// The id is dropped so the value is what gets written.
    pub fn set(&mut self, value: E) {
        self.id = None;
        self.value = Some(value);
        self.color = None;
    }
}

impl<E: Serialize> SelectEntry<E> {
    /// The form Baserow accepts when writing: the id if known, else the value
    pub fn to_api_value(&self) -> Result<Value> {
        match (&self.id, &self.value) {
            (Some(id), _) => Ok(Value::from(*id)),
            (None, Some(value)) => Ok(serde_json::to_value(value)?),
            (None, None) => Err(Error::missing_id_or_value("SelectEntry")),
        }
    }
}

impl<E: Serialize> Serialize for SelectEntry<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_api_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct RawSelectEntry<E> {
    id: Option<u64>,
    value: Option<E>,
    color: Option<String>,
}

impl<'de, E: DeserializeOwned> Deserialize<'de> for SelectEntry<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawSelectEntry::<E>::deserialize(deserializer)?;
        let mut entry = SelectEntry::new(raw.id, raw.value).map_err(serde::de::Error::custom)?;
        entry.color = raw.color;
        Ok(entry)
    }
}

/// A multiple select cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleSelectField<E>(pub Vec<SelectEntry<E>>);

impl<E> MultipleSelectField<E> {
    /// Select the given options by value
    pub fn from_values(values: impl IntoIterator<Item = E>) -> Self {
        Self(values.into_iter().map(SelectEntry::from_value).collect())
    }

    /// Add an option by value
    pub fn push(&mut self, value: E) {
        self.0.push(SelectEntry::from_value(value));
    }

    /// Selected values, skipping entries only known by id
    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.0.iter().filter_map(SelectEntry::value)
    }

    /// Number of selected options
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<E: PartialEq> MultipleSelectField<E> {
    /// Check whether an option is selected
    pub fn contains(&self, value: &E) -> bool {
        self.0.iter().any(|entry| entry.value.as_ref() == Some(value))
    }
}

impl<E> Default for MultipleSelectField<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<E: Serialize> Serialize for MultipleSelectField<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, E: DeserializeOwned> Deserialize<'de> for MultipleSelectField<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<SelectEntry<E>>::deserialize(deserializer).map(Self)
    }
}
