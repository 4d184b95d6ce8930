//! Query dispatch against the Athena datasource proxy.
//!
//! [`Datasource`] batches enabled queries into one request, maps each
//! query's result back by correlation id and converts it into frames. It
//! also serves the named-query lookup and the health check.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FramesError, Result};
use crate::frame::{build_series_frame, build_table_frame, OutputFrame};
use crate::query::{
    fill_defaults, FormatType, QueryDescriptor, QueryRequest, QueryType, ResolvedQuery, TimeRange,
};
use crate::result::{classify, QueryResponse};
use crate::transport::Transport;

/// Correlation id of the named-query lookup.
pub const METRIC_FIND_REF_ID: &str = "metricFindQuery";

/// Correlation id of the health-check probe.
pub const HEALTH_CHECK_REF_ID: &str = "healthCheck";

/// A selectable named query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedQueryOption {
    pub text: String,
    pub value: String,
    pub label: String,
}

/// Outcome of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Success,
    Failed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub message: String,
}

/// Client for one configured datasource.
///
/// Holds no per-call state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct Datasource {
    transport: Arc<dyn Transport>,
    datasource_id: i64,
}

impl Datasource {
    pub fn new(transport: Arc<dyn Transport>, datasource_id: i64) -> Self {
        Self {
            transport,
            datasource_id,
        }
    }

    pub fn datasource_id(&self) -> i64 {
        self.datasource_id
    }

    /// Dispatches `descriptors` over `range` and returns their frames.
    ///
    /// Frames come back in submission order; within one query, series frames
    /// precede table frames. Hidden descriptors are not sent and yield nothing.
    pub async fn query(
        &self,
        descriptors: &[QueryDescriptor],
        range: &TimeRange,
    ) -> Result<Vec<OutputFrame>> {
        let queries = prepare_queries(descriptors)?;
        if queries.is_empty() {
            debug!("No enabled queries, skipping request");
            return Ok(Vec::new());
        }

        info!(
            queries = queries.len(),
            from = %range.from,
            to = %range.to,
            "Dispatching queries"
        );
        let request = QueryRequest::new(self.datasource_id, &queries, Some(range));
        let response = self.execute(&request).await?;

        let mut frames = Vec::new();
        for query in &queries {
            frames.extend(frames_for_query(query, &response)?);
        }
        debug!(frames = frames.len(), "Converted query results");
        Ok(frames)
    }

    /// Like [`Datasource::query`], but gives up when `cancel` fires.
    ///
    /// Cancellation drops the in-flight call and returns
    /// [`FramesError::Cancelled`]; nothing is returned partially.
    pub async fn query_with_cancel(
        &self,
        descriptors: &[QueryDescriptor],
        range: &TimeRange,
        cancel: &CancellationToken,
    ) -> Result<Vec<OutputFrame>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Query dispatch cancelled");
                Err(FramesError::Cancelled)
            }
            result = self.query(descriptors, range) => result,
        }
    }

    /// Lists the named queries registered for the datasource's work group.
    pub async fn list_named_queries(&self) -> Result<Vec<NamedQueryOption>> {
        let query = fill_defaults(
            &QueryDescriptor::new(METRIC_FIND_REF_ID)
                .with_query_type(QueryType::GetNamedQueryMetrics)
                .with_format(FormatType::Table),
        );
        let request = QueryRequest::new(self.datasource_id, &[query], None);
        let response = self.execute(&request).await?;

        let entry = response
            .result(METRIC_FIND_REF_ID)
            .ok_or_else(|| FramesError::missing_result(METRIC_FIND_REF_ID))?;
        let table = entry.tables.first().ok_or_else(|| {
            FramesError::malformed_table(METRIC_FIND_REF_ID, 0, "expected a table of named queries")
        })?;

        table
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| match row.as_slice() {
                [text, value, ..] => {
                    let value = cell_text(value);
                    Ok(NamedQueryOption {
                        text: cell_text(text),
                        label: value.clone(),
                        value,
                    })
                }
                _ => Err(FramesError::malformed_table(
                    METRIC_FIND_REF_ID,
                    0,
                    format!("row {row_index} has {} cells, expected 2", row.len()),
                )),
            })
            .collect()
    }

    /// Probes connectivity and credentials with a no-op query.
    ///
    /// Never fails: transport errors are reported as [`HealthStatus::Error`].
    pub async fn check_health(&self) -> HealthCheck {
        let query = fill_defaults(&QueryDescriptor::new(HEALTH_CHECK_REF_ID));
        let request = QueryRequest::new(self.datasource_id, &[query], None);

        match self.transport.send(&request).await {
            Ok(response) if response.is_success() => HealthCheck {
                status: HealthStatus::Success,
                message: "Success".to_string(),
            },
            Ok(response) => {
                warn!(status = response.status, "Health check failed");
                HealthCheck {
                    status: HealthStatus::Failed,
                    message: "Failed".to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Health check errored");
                HealthCheck {
                    status: HealthStatus::Error,
                    message: format!("Error: {}", e),
                }
            }
        }
    }

    /// Sends `request` and decodes a successful reply.
    async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(FramesError::transport(response.error_message()));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| FramesError::decode(format!("Invalid query response: {}", e)))
    }
}

/// Drops hidden descriptors, fills defaults and checks id uniqueness.
fn prepare_queries(descriptors: &[QueryDescriptor]) -> Result<Vec<ResolvedQuery>> {
    let mut seen = HashSet::new();
    let mut queries = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if !descriptor.is_enabled() {
            debug!(ref_id = %descriptor.ref_id, "Skipping hidden query");
            continue;
        }
        if !seen.insert(descriptor.ref_id.as_str()) {
            return Err(FramesError::invalid_query(format!(
                "duplicate query id '{}'",
                descriptor.ref_id
            )));
        }

        let query = fill_defaults(descriptor);
        if let Some(warning) = query.validation_warning() {
            warn!("{}", warning);
        }
        queries.push(query);
    }

    Ok(queries)
}

/// Converts the result of `query` into frames: series first, then tables.
pub fn frames_for_query(query: &ResolvedQuery, response: &QueryResponse) -> Result<Vec<OutputFrame>> {
    let entry = response
        .result(&query.ref_id)
        .ok_or_else(|| FramesError::missing_result(&query.ref_id))?;

    let shape = classify(entry);
    let mut frames = Vec::new();

    if shape.has_series() {
        frames.extend(
            entry
                .series
                .iter()
                .map(|series| build_series_frame(series, &query.ref_id)),
        );
    }
    if shape.has_tables() {
        for (index, table) in entry.tables.iter().enumerate() {
            frames.push(build_table_frame(
                table,
                entry.column_infos(),
                &query.ref_id,
                query.time_column_override(),
                index,
            )?);
        }
    }
    if shape.is_empty() {
        debug!(ref_id = %query.ref_id, "Query returned no data");
    }

    Ok(frames)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
