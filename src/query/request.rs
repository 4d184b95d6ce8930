//! Outbound request body for the query proxy.

use serde::{Deserialize, Serialize};

use super::descriptor::{FormatType, QueryType, ResolvedQuery};
use super::TimeRange;

/// One batched request: the time range plus every enabled query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    pub queries: Vec<RequestQuery>,
}

impl QueryRequest {
    /// Builds a request tagging every query with `datasource_id`.
    pub fn new(datasource_id: i64, queries: &[ResolvedQuery], range: Option<&TimeRange>) -> Self {
        Self {
            from: range.map(|r| r.from.clone()),
            to: range.map(|r| r.to.clone()),
            queries: queries
                .iter()
                .map(|q| RequestQuery::new(datasource_id, q))
                .collect(),
        }
    }

    /// Returns the correlation ids in submission order.
    pub fn ref_ids(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.ref_id.as_str())
    }
}

/// A single query entry in [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    pub datasource_id: i64,
    pub ref_id: String,
    pub query_type: QueryType,
    pub named_query: String,
    pub time_column: String,
    pub metric_column: String,
    /// Comma-joined, as the backend splits on ','.
    pub value_columns: String,
    pub execution_id: String,
    pub format: FormatType,
    pub use_cache: bool,
}

impl RequestQuery {
    fn new(datasource_id: i64, query: &ResolvedQuery) -> Self {
        Self {
            datasource_id,
            ref_id: query.ref_id.clone(),
            query_type: query.query_type,
            named_query: query.named_query.clone(),
            time_column: query.time_column.clone(),
            metric_column: query.metric_column.clone(),
            value_columns: query.value_columns.join(","),
            execution_id: query.execution_id.clone(),
            format: query.format,
            use_cache: query.use_cache,
        }
    }
}
