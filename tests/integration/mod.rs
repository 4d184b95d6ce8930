//! Integration tests for athena-frames.
//!
//! These run against the in-memory mock transport; no proxy is needed.

pub mod dispatch_test;
pub mod lookup_test;
