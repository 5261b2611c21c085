//! CRM store error types.

use thiserror::Error;

/// A rejected call to the CRM store.
///
/// The store only reports what went wrong on the wire; classifying the
/// status into retryable or fatal failures is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("CRM request failed (status {status:?}): {message}")]
pub struct CrmStoreError {
    pub status: Option<u16>,
    pub message: String,
}

impl CrmStoreError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self::new(Some(status), format!("status {status}"))
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::new(Some(404), format!("{what} not found"))
    }
}
