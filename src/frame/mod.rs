//! Output frames for athena-frames.
//!
//! A frame is a set of named, typed, row-aligned fields handed to the
//! visualization layer.

mod builder;
mod resolve;

pub use builder::{build_series_frame, build_table_frame};
pub use resolve::resolve_field_type;

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Time,
    Number,
    Boolean,
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single column of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub values: Vec<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            field_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A frame produced for one series or one table of a query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFrame {
    pub ref_id: String,
    /// Series name for series-derived frames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<Field>,
}

impl OutputFrame {
    /// Number of rows; every field has this many values.
    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
