//! Query descriptors and the outbound request for athena-frames.
//!
//! Callers build partial [`QueryDescriptor`]s; dispatch fills them into
//! [`ResolvedQuery`]s and batches them into one [`QueryRequest`].

pub mod descriptor;
pub mod request;
mod time_range;

pub use descriptor::{
    fill_defaults, FormatType, QueryDescriptor, QueryType, ResolvedQuery, DEFAULT_METRIC_COLUMN,
    DEFAULT_TIME_COLUMN,
};
pub use request::{QueryRequest, RequestQuery};
pub use time_range::TimeRange;
