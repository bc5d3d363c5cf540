//! Column types and attribute values understood by the host
//!
//! Every record carries a set of extra columns. The host declares each
//! column with a type code and expects plain JSON scalars as values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Date/time layout the host parses for `Date/Time` columns
pub const HOST_DATETIME_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Column name to value mapping attached to a record
pub type Attributes = BTreeMap<String, Scalar>;

/// Column types known to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Numerical,
    Integer,
    Boolean,
    String,
    DateTime,
    StringId,
    IntegerId,
    Text,
}

impl ColumnType {
    /// Returns the type code the host uses in its column declarations
    pub fn code(&self) -> &'static str {
        match self {
            Self::Numerical => "$num",
            Self::Integer => "$num_int",
            Self::Boolean => "$bool",
            Self::String => "$cat_string",
            Self::DateTime => "$num_datetime",
            Self::StringId => "$cat",
            Self::IntegerId => "$id",
            Self::Text => "$text",
        }
    }

    /// Returns the human-readable name shown by the host
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Numerical => "Numerical",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "Date/Time",
            Self::StringId => "String ID",
            Self::IntegerId => "Integer ID",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Renders a timestamp in the host's `Date/Time` layout
pub fn format_host_datetime(value: &NaiveDateTime) -> String {
    value.format(HOST_DATETIME_FORMAT).to_string()
}
