//! Error types for athena-frames.
//!
//! Defines the error enum surfaced by dispatch, lookup and configuration.

use thiserror::Error;

/// Main error type for athena-frames operations.
#[derive(Error, Debug)]
pub enum FramesError {
    /// The outbound call failed (connect, timeout, auth, non-success status).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response carried no entry for a submitted query.
    #[error("Missing result for query '{ref_id}'")]
    MissingResult { ref_id: String },

    /// A table in the response did not have the documented shape.
    #[error("Malformed table {table} for query '{ref_id}': {reason}")]
    MalformedTable {
        ref_id: String,
        table: usize,
        reason: String,
    },

    /// The caller's queries cannot be dispatched as given (e.g. duplicate ids).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The call was cancelled before the response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FramesError {
    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a missing-result error for the given query id.
    pub fn missing_result(ref_id: impl Into<String>) -> Self {
        Self::MissingResult {
            ref_id: ref_id.into(),
        }
    }

    /// Creates a malformed-table error for table `table` of query `ref_id`.
    pub fn malformed_table(
        ref_id: impl Into<String>,
        table: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedTable {
            ref_id: ref_id.into(),
            table,
            reason: reason.into(),
        }
    }

    /// Creates an invalid-query error with the given message.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Creates a decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "Transport Error",
            Self::MissingResult { .. } => "Missing Result",
            Self::MalformedTable { .. } => "Malformed Table",
            Self::InvalidQuery(_) => "Invalid Query",
            Self::Cancelled => "Cancelled",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the query id this error refers to, if any.
    pub fn ref_id(&self) -> Option<&str> {
        match self {
            Self::MissingResult { ref_id } | Self::MalformedTable { ref_id, .. } => Some(ref_id),
            _ => None,
        }
    }
}

/// Result type alias using FramesError.
pub type Result<T> = std::result::Result<T, FramesError>;
