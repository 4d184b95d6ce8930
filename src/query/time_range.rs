use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Dashboard time range as epoch-millisecond strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_millis(from: i64, to: i64) -> Self {
        Self::new(from.to_string(), to.to_string())
    }

    /// The range ending now and spanning `span`.
    pub fn last(span: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let to = now.as_millis() as i64;
        let from = now.saturating_sub(span).as_millis() as i64;
        Self::from_millis(from, to)
    }
}
