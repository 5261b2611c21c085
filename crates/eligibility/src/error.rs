//! Eligibility error types and the transport status table.

use thiserror::Error;

/// Failure reported by the transport that talks to the eligibility service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("eligibility transport failed (status {status:?}): {message}")]
pub struct TransportError {
    /// HTTP status, if the request got as far as a response.
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self::new(Some(status), format!("status {status}"))
    }
}

/// Errors surfaced by the eligibility service adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    /// The licence has been superseded by a newer one.
    #[error("Licence is not the latest issued licence")]
    NotLatestLicence,

    /// The eligibility service is rate limiting us.
    #[error("Too many requests to the eligibility service")]
    TooManyRequests,

    /// The eligibility service failed.
    #[error("Eligibility service error (status {0})")]
    ServerError(u16),

    /// Our credentials were rejected. Never retried.
    #[error("Eligibility service rejected our credentials (status {0})")]
    AuthError(u16),

    /// No record for this licence.
    #[error("Licence not found")]
    LicenceNotFound,

    /// Anything else, including malformed payloads.
    #[error("Failed to retrieve eligibility: {0}")]
    RetrieveError(String),
}

impl EligibilityError {
    /// Returns true if asking again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EligibilityError::TooManyRequests | EligibilityError::ServerError(_)
        )
    }

    /// Returns false for failures that must go to the generic failure path.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EligibilityError::AuthError(_))
    }
}

impl From<TransportError> for EligibilityError {
    fn from(err: TransportError) -> Self {
        match err.status {
            Some(409) => EligibilityError::NotLatestLicence,
            Some(429) => EligibilityError::TooManyRequests,
            Some(status @ 500..=599) => EligibilityError::ServerError(status),
            Some(status @ (401 | 403)) => EligibilityError::AuthError(status),
            Some(400 | 404) => EligibilityError::LicenceNotFound,
            _ => EligibilityError::RetrieveError(err.message),
        }
    }
}
