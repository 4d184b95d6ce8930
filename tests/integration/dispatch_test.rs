//! Query dispatch integration tests.
//!
//! Drives the public API end to end against a mock transport.

use athena_frames::datasource::Datasource;
use athena_frames::error::FramesError;
use athena_frames::frame::{Field, FieldType};
use athena_frames::query::{FormatType, QueryDescriptor, QueryType, TimeRange};
use athena_frames::transport::MockTransport;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn dashboard_response() -> serde_json::Value {
    json!({
        "results": {
            "A": {
                "series": [
                    {"name": "web-1 requests", "points": [[10.0, 1000], [12.0, 2000]]},
                    {"name": "web-2 requests", "points": [[7.0, 1000]]}
                ],
                "tables": null
            },
            "B": {
                "tables": [{
                    "columns": [{"text": "time"}, {"text": "host"}, {"text": "healthy"}, {"text": "latency"}],
                    "rows": [
                        [1000, "web-1", true, 12.5],
                        [2000, "web-2", false, 40.1]
                    ]
                }],
                "meta": {"colInfos": [
                    {"colName": "time", "colType": 2},
                    {"colName": "host", "colType": 4},
                    {"colName": "healthy", "colType": 3},
                    {"colName": "latency", "colType": 1}
                ]}
            },
            "C": {"series": [], "tables": []}
        }
    })
}

#[tokio::test]
async fn test_dashboard_round_trip() {
    let transport = Arc::new(MockTransport::with_json(dashboard_response()));
    let datasource = Datasource::new(transport.clone(), 42);

    let descriptors = vec![
        QueryDescriptor::new("A")
            .with_query_type(QueryType::NamedQuery)
            .with_named_query("requests_by_host"),
        QueryDescriptor::new("B")
            .with_query_type(QueryType::ExecutionQuery)
            .with_execution_id("0f3c-exec")
            .with_format(FormatType::Table),
        QueryDescriptor::new("C"),
        QueryDescriptor::new("D").hidden(),
    ];
    let frames = datasource
        .query(&descriptors, &TimeRange::from_millis(0, 5_000))
        .await
        .unwrap();

    let summary: Vec<(&str, Option<&str>, usize)> = frames
        .iter()
        .map(|f| (f.ref_id.as_str(), f.name.as_deref(), f.fields.len()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A", Some("web-1 requests"), 2),
            ("A", Some("web-2 requests"), 2),
            ("B", None, 4),
        ]
    );

    let table = &frames[2];
    let types: Vec<FieldType> = table.fields.iter().map(|f| f.field_type).collect();
    assert_eq!(
        types,
        vec![
            FieldType::Number,
            FieldType::String,
            FieldType::Boolean,
            FieldType::Number
        ]
    );
    assert_eq!(table.row_count(), 2);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].ref_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert!(requests[0].queries.iter().all(|q| q.datasource_id == 42));
}

#[tokio::test]
async fn test_time_series_table_types_time_column() {
    let transport = Arc::new(MockTransport::with_json(json!({
        "results": {"A": {
            "tables": [{
                "columns": [{"text": "time"}, {"text": "value"}],
                "rows": [[1000, 1.5], [2000, 2.7]]
            }],
            "meta": {"colInfos": [
                {"colName": "time", "colType": 4},
                {"colName": "value", "colType": 1}
            ]}
        }}
    })));
    let datasource = Datasource::new(transport, 1);

    let frames = datasource
        .query(&[QueryDescriptor::new("A")], &TimeRange::from_millis(0, 3_000))
        .await
        .unwrap();

    assert_eq!(
        frames[0].fields,
        vec![
            Field::new("time", FieldType::Time, vec![json!(1000), json!(2000)]),
            Field::new("value", FieldType::Number, vec![json!(1.5), json!(2.7)]),
        ]
    );
}

#[tokio::test]
async fn test_missing_result_fails_whole_dispatch() {
    let transport = Arc::new(MockTransport::with_json(json!({
        "results": {"A": {"tables": []}}
    })));
    let datasource = Datasource::new(transport, 1);

    let result = datasource
        .query(
            &[
                QueryDescriptor::new("A").with_format(FormatType::Table),
                QueryDescriptor::new("B").with_format(FormatType::TimeSeries),
            ],
            &TimeRange::from_millis(0, 1_000),
        )
        .await;

    let err = tokio_test::assert_err!(result);
    assert!(matches!(err, FramesError::MissingResult { .. }));
    assert_eq!(err.ref_id(), Some("B"));
}

#[tokio::test]
async fn test_concurrent_dispatches_are_independent() {
    let transport = Arc::new(MockTransport::with_json(dashboard_response()));
    let datasource = Datasource::new(transport.clone(), 1);
    let range = TimeRange::from_millis(0, 1_000);

    let only_a = [QueryDescriptor::new("A")];
    let only_b = [QueryDescriptor::new("B").with_format(FormatType::Table)];
    let (a, b) = tokio::join!(
        datasource.query(&only_a, &range),
        datasource.query(&only_b, &range),
    );

    let a = tokio_test::assert_ok!(a);
    let b = tokio_test::assert_ok!(b);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 1);
    assert_eq!(transport.requests().len(), 2);
}
