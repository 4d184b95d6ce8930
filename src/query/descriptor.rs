//! Query descriptor types and default filling.
//!
//! A [`QueryDescriptor`] is what a caller (or a dashboard target) supplies:
//! everything but the id is optional. [`fill_defaults`] turns it into a
//! [`ResolvedQuery`] with every field set, once, at dispatch entry.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default name of the time column.
pub const DEFAULT_TIME_COLUMN: &str = "time";

/// Default name of the metric column.
pub const DEFAULT_METRIC_COLUMN: &str = "metric";

/// Kind of query the backend should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum QueryType {
    /// Connectivity probe; the backend lists named queries and returns nothing.
    #[default]
    TestQuery,
    /// Run a pre-registered named query.
    NamedQuery,
    /// Fetch the results of an existing execution id.
    ExecutionQuery,
    /// List named queries for the configured work group.
    GetNamedQueryMetrics,
}

impl QueryType {
    /// Returns the wire representation. `TestQuery` is the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestQuery => "",
            Self::NamedQuery => "NamedQuery",
            Self::ExecutionQuery => "ExecutionQuery",
            Self::GetNamedQueryMetrics => "GetNamedQueryMetrics",
        }
    }
}

impl FromStr for QueryType {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to `TestQuery`, matching the backend's switch.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "NamedQuery" => Self::NamedQuery,
            "ExecutionQuery" => Self::ExecutionQuery,
            "GetNamedQueryMetrics" => Self::GetNamedQueryMetrics,
            _ => Self::TestQuery,
        })
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestQuery => write!(f, "TestQuery"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl Serialize for QueryType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QueryType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Output shape requested for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    #[default]
    TimeSeries,
    Table,
}

/// A query as supplied by the caller. Unset fields are filled at dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// Correlation id, unique within one dispatch call.
    pub ref_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_column: Option<String>,

    /// Accepts either a list or a comma-separated string.
    #[serde(
        default,
        deserialize_with = "deserialize_value_columns",
        skip_serializing_if = "Option::is_none"
    )]
    pub value_columns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,

    /// Hidden targets are dropped before dispatch.
    #[serde(default)]
    pub hide: bool,
}

impl QueryDescriptor {
    /// Creates a descriptor with only the correlation id set.
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            ..Default::default()
        }
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    pub fn with_named_query(mut self, name: impl Into<String>) -> Self {
        self.named_query = Some(name.into());
        self
    }

    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.execution_id = Some(id.into());
        self
    }

    pub fn with_format(mut self, format: FormatType) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_time_column(mut self, column: impl Into<String>) -> Self {
        self.time_column = Some(column.into());
        self
    }

    pub fn with_metric_column(mut self, column: impl Into<String>) -> Self {
        self.metric_column = Some(column.into());
        self
    }

    pub fn with_value_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = Some(use_cache);
        self
    }

    /// Marks the descriptor as hidden so dispatch skips it.
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    /// Returns true if this descriptor takes part in dispatch.
    pub fn is_enabled(&self) -> bool {
        !self.hide
    }
}

/// A descriptor with every field filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub ref_id: String,
    pub query_type: QueryType,
    pub named_query: String,
    pub execution_id: String,
    pub format: FormatType,
    pub time_column: String,
    pub metric_column: String,
    /// Ordered, duplicate-free. Empty means every numeric column.
    pub value_columns: Vec<String>,
    pub use_cache: bool,
}

impl ResolvedQuery {
    /// Time column used for field typing, only for time-series queries.
    pub fn time_column_override(&self) -> Option<&str> {
        match self.format {
            FormatType::TimeSeries => Some(self.time_column.as_str()),
            FormatType::Table => None,
        }
    }

    /// Describes what the backend will reject, if anything.
    ///
    /// The backend is authoritative; dispatch only logs these.
    pub fn validation_warning(&self) -> Option<String> {
        match self.query_type {
            QueryType::ExecutionQuery if self.execution_id.is_empty() => Some(format!(
                "query '{}' is an execution query without an execution id",
                self.ref_id
            )),
            QueryType::NamedQuery if self.named_query.is_empty() => Some(format!(
                "query '{}' is a named query without a query name",
                self.ref_id
            )),
            _ => None,
        }
    }
}

/// Fills every unset field of `descriptor` from the documented defaults.
pub fn fill_defaults(descriptor: &QueryDescriptor) -> ResolvedQuery {
    let mut value_columns: Vec<String> = Vec::new();
    for column in descriptor.value_columns.iter().flatten() {
        let column = column.trim();
        if !column.is_empty() && !value_columns.iter().any(|c| c == column) {
            value_columns.push(column.to_string());
        }
    }

    ResolvedQuery {
        ref_id: descriptor.ref_id.clone(),
        query_type: descriptor.query_type.unwrap_or_default(),
        named_query: descriptor.named_query.clone().unwrap_or_default(),
        execution_id: descriptor.execution_id.clone().unwrap_or_default(),
        format: descriptor.format.unwrap_or_default(),
        time_column: descriptor
            .time_column
            .clone()
            .unwrap_or_else(|| DEFAULT_TIME_COLUMN.to_string()),
        metric_column: descriptor
            .metric_column
            .clone()
            .unwrap_or_else(|| DEFAULT_METRIC_COLUMN.to_string()),
        value_columns,
        use_cache: descriptor.use_cache.unwrap_or(true),
    }
}

/// Splits a comma-separated column list, trimming entries and dropping empties.
fn split_columns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

fn deserialize_value_columns<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawColumns {
        List(Vec<String>),
        Joined(String),
    }

    Ok(
        Option::<RawColumns>::deserialize(deserializer)?.map(|raw| match raw {
            RawColumns::List(columns) => columns,
            RawColumns::Joined(joined) => split_columns(&joined),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fill_defaults_empty_descriptor() {
        let resolved = fill_defaults(&QueryDescriptor::new("A"));

        assert_eq!(
            resolved,
            ResolvedQuery {
                ref_id: "A".to_string(),
                query_type: QueryType::TestQuery,
                named_query: String::new(),
                execution_id: String::new(),
                format: FormatType::TimeSeries,
                time_column: "time".to_string(),
                metric_column: "metric".to_string(),
                value_columns: vec![],
                use_cache: true,
            }
        );
    }

    #[test]
    fn test_fill_defaults_keeps_set_fields() {
        let descriptor = QueryDescriptor::new("B")
            .with_query_type(QueryType::NamedQuery)
            .with_named_query("daily_errors")
            .with_format(FormatType::Table)
            .with_time_column("ts")
            .with_use_cache(false);

        let resolved = fill_defaults(&descriptor);
        assert_eq!(resolved.query_type, QueryType::NamedQuery);
        assert_eq!(resolved.named_query, "daily_errors");
        assert_eq!(resolved.format, FormatType::Table);
        assert_eq!(resolved.time_column, "ts");
        assert_eq!(resolved.metric_column, "metric");
        assert!(!resolved.use_cache);
    }

    #[test]
    fn test_fill_defaults_dedups_value_columns_in_order() {
        let descriptor =
            QueryDescriptor::new("A").with_value_columns(["p99", " p50", "p99", "", "max"]);
        let resolved = fill_defaults(&descriptor);
        assert_eq!(resolved.value_columns, vec!["p99", "p50", "max"]);
    }

    #[test]
    fn test_time_column_override_only_for_time_series() {
        let series = fill_defaults(&QueryDescriptor::new("A"));
        assert_eq!(series.time_column_override(), Some("time"));

        let table = fill_defaults(&QueryDescriptor::new("A").with_format(FormatType::Table));
        assert_eq!(table.time_column_override(), None);
    }

    #[test]
    fn test_validation_warning() {
        let exec = fill_defaults(
            &QueryDescriptor::new("A").with_query_type(QueryType::ExecutionQuery),
        );
        assert!(exec.validation_warning().unwrap().contains("execution id"));

        let named =
            fill_defaults(&QueryDescriptor::new("A").with_query_type(QueryType::NamedQuery));
        assert!(named.validation_warning().unwrap().contains("query name"));

        let ok = fill_defaults(
            &QueryDescriptor::new("A")
                .with_query_type(QueryType::ExecutionQuery)
                .with_execution_id("abc-123"),
        );
        assert_eq!(ok.validation_warning(), None);
    }

    #[test]
    fn test_query_type_wire_names() {
        assert_eq!(serde_json::to_string(&QueryType::TestQuery).unwrap(), "\"\"");
        assert_eq!(
            serde_json::to_string(&QueryType::GetNamedQueryMetrics).unwrap(),
            "\"GetNamedQueryMetrics\""
        );
        let parsed: QueryType = serde_json::from_str("\"NamedQuery\"").unwrap();
        assert_eq!(parsed, QueryType::NamedQuery);
        let unknown: QueryType = serde_json::from_str("\"Whatever\"").unwrap();
        assert_eq!(unknown, QueryType::TestQuery);
    }

    #[test]
    fn test_deserialize_dashboard_target() {
        let json = r#"{
            "refId": "A",
            "queryType": "NamedQuery",
            "namedQuery": "requests",
            "format": "table",
            "valueColumns": "count, latency",
            "hide": true
        }"#;
        let descriptor: QueryDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(descriptor.ref_id, "A");
        assert_eq!(descriptor.query_type, Some(QueryType::NamedQuery));
        assert_eq!(descriptor.format, Some(FormatType::Table));
        assert_eq!(
            descriptor.value_columns,
            Some(vec!["count".to_string(), "latency".to_string()])
        );
        assert!(!descriptor.is_enabled());
    }

    #[test]
    fn test_deserialize_value_columns_list() {
        let json = r#"{"refId": "A", "valueColumns": ["a", "b"]}"#;
        let descriptor: QueryDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor.value_columns,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(descriptor.is_enabled());
    }
}
