//! athena-frames - dispatches Athena datasource queries and reshapes the
//! results into visualization frames.
//!
//! This library exposes the core modules for use in integration tests.

pub mod config;
pub mod datasource;
pub mod error;
pub mod frame;
pub mod logging;
pub mod query;
pub mod result;
pub mod transport;
