//! Integration tests for athena-frames.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
