//! Error type for remote-store operations.

use thiserror::Error;

/// Terminal failure of one store operation, surfaced after the client's own
/// retry policy is exhausted. Carries enough context for display: what was
/// attempted (`endpoint`) and, when the server answered at all, the HTTP
/// status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{endpoint}: {message}")]
pub struct StoreError {
    pub message: String,
    pub status: Option<u16>,
    pub endpoint: String,
}

impl StoreError {
    pub fn new(endpoint: &str, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
            endpoint: endpoint.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
