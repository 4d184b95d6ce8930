//! Named-query lookup and health check integration tests.

use athena_frames::datasource::{Datasource, HealthStatus, NamedQueryOption};
use athena_frames::transport::{FailingTransport, MockTransport};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_list_named_queries() {
    let datasource = Datasource::new(
        Arc::new(MockTransport::with_json(json!({
            "results": {"metricFindQuery": {"tables": [{
                "columns": [{"text": "text"}, {"text": "value"}],
                "rows": [["a", "1"], ["b", "2"]]
            }]}}
        }))),
        1,
    );

    let options = datasource.list_named_queries().await.unwrap();
    let expected = vec![
        NamedQueryOption {
            text: "a".into(),
            value: "1".into(),
            label: "1".into(),
        },
        NamedQueryOption {
            text: "b".into(),
            value: "2".into(),
            label: "2".into(),
        },
    ];
    assert_eq!(options, expected);
}

#[tokio::test]
async fn test_list_named_queries_missing_entry() {
    let datasource = Datasource::new(Arc::new(MockTransport::default()), 1);
    let err = datasource.list_named_queries().await.unwrap_err();
    assert_eq!(err.ref_id(), Some("metricFindQuery"));
}

#[tokio::test]
async fn test_health_check_never_raises() {
    let cases = [
        (
            Datasource::new(Arc::new(MockTransport::default()), 1),
            HealthStatus::Success,
        ),
        (
            Datasource::new(Arc::new(MockTransport::with_status(500, json!({}))), 1),
            HealthStatus::Failed,
        ),
        (
            Datasource::new(Arc::new(FailingTransport::new("timed out")), 1),
            HealthStatus::Error,
        ),
    ];

    for (datasource, expected) in cases {
        assert_eq!(datasource.check_health().await.status, expected);
    }
}

#[tokio::test]
async fn test_health_check_serializes_lowercase() {
    let datasource = Datasource::new(Arc::new(MockTransport::default()), 1);
    let health = datasource.check_health().await;
    assert_eq!(
        serde_json::to_value(&health).unwrap(),
        json!({"status": "success", "message": "Success"})
    );
}
