//! Error types: mapping failures and vendor-reported faults

use serde_json::Value;
use thiserror::Error;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The vendor signalled a failure, via HTTP status or an embedded
    /// error sentinel.
    #[error(transparent)]
    Fault(#[from] ApiFault),
    /// A payload did not satisfy the mapper's mandatory-key expectations.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// Transport-level failure.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Malformed or incomplete JSON relative to the mandatory-key expectations
/// of the metadata mapper.
///
/// Mandatory fields are never silently defaulted; a missing or unusable one
/// fails the whole mapping call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("expected a JSON object while mapping {context}")]
    NotAnObject { context: &'static str },
    #[error("missing mandatory key `{key}` while mapping {context}")]
    MissingKey {
        key: &'static str,
        context: &'static str,
    },
    #[error("key `{key}` has an unexpected type while mapping {context}, expected {expected}")]
    InvalidType {
        key: &'static str,
        context: &'static str,
        expected: &'static str,
    },
}

/// A failure reported by the vendor API.
///
/// Carries the HTTP status alongside the vendor's own error code, message
/// and free-form details. Raised synchronously and never retried here;
/// retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("API fault (HTTP {status_code}) {code}: {message}")]
pub struct ApiFault {
    pub status_code: u16,
    pub code: String,
    pub message: String,
    pub details: Value,
}

impl ApiFault {
    /// Build a fault from a payload carrying `code`/`message`/`details`.
    pub(crate) fn from_payload(payload: &Value, status_code: u16) -> Self {
        let field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            status_code,
            code: field("code"),
            message: field("message"),
            details: payload.get("details").cloned().unwrap_or(Value::Null),
        }
    }
}
