//! Inbound response types for athena-frames.
//!
//! The proxy answers one batched request with a map from correlation id to
//! a [`QueryResultEntry`], each carrying optional series, tables and column
//! metadata.

mod classify;

pub use classify::{classify, ResultShape};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Response body of the query proxy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: HashMap<String, QueryResultEntry>,
}

impl QueryResponse {
    /// Looks up the result for a correlation id.
    pub fn result(&self, ref_id: &str) -> Option<&QueryResultEntry> {
        self.results.get(ref_id)
    }
}

/// The result of a single query. Both series and tables may be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResultEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub series: Vec<ResultSeries>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: Vec<ResultTable>,

    #[serde(default)]
    pub meta: Option<ResultMeta>,
}

impl QueryResultEntry {
    /// Column metadata, empty when the backend sent none.
    pub fn column_infos(&self) -> &[ColumnDescriptor] {
        self.meta
            .as_ref()
            .map(|m| m.col_infos.as_slice())
            .unwrap_or_default()
    }
}

/// A named sequence of `[value, timestamp]` points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultSeries {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: Vec<(Value, Value)>,
}

/// A table of raw cells. Every row should have one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultTable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<TableColumn>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableColumn {
    pub text: String,
}

/// Engine metadata attached to a result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub col_infos: Vec<ColumnDescriptor>,
}

/// Declared engine type of a named column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "colName")]
    pub name: String,
    #[serde(rename = "colType", default)]
    pub declared_type: DeclaredType,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// Finds the declared type of `name`. Exact match, first match wins.
pub fn lookup_declared_type(meta: &[ColumnDescriptor], name: &str) -> Option<DeclaredType> {
    meta.iter()
        .find(|info| info.name == name)
        .map(|info| info.declared_type)
}

/// Column type as reported by the engine.
///
/// Arrives either as a protobuf-style code (`0..=5`) or as its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(from = "RawDeclaredType")]
pub enum DeclaredType {
    Null,
    Double,
    Int,
    Bool,
    String,
    Bytes,
    #[default]
    Unknown,
}

impl DeclaredType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Null,
            1 => Self::Double,
            2 => Self::Int,
            3 => Self::Bool,
            4 => Self::String,
            5 => Self::Bytes,
            _ => Self::Unknown,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "NULL" | "TYPE_NULL" => Self::Null,
            "DOUBLE" | "TYPE_DOUBLE" => Self::Double,
            "INT" | "INT64" | "TYPE_INT64" => Self::Int,
            "BOOL" | "TYPE_BOOL" => Self::Bool,
            "STRING" | "TYPE_STRING" => Self::String,
            "BYTES" | "TYPE_BYTES" => Self::Bytes,
            _ => Self::Unknown,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeclaredType {
    Code(i64),
    Name(String),
    Other(Value),
}

impl From<RawDeclaredType> for DeclaredType {
    fn from(raw: RawDeclaredType) -> Self {
        match raw {
            RawDeclaredType::Code(code) => Self::from_code(code),
            RawDeclaredType::Name(name) => Self::from_name(&name),
            RawDeclaredType::Other(_) => Self::Unknown,
        }
    }
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
