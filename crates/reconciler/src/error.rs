//! Reconciler error types.

use common::Agency;
use crm::{CrmOperation, CrmStoreError};
use eligibility::EligibilityError;
use thiserror::Error;

use crate::stage::VerificationStage;

/// One identity field that did not match the eligibility record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MismatchCause {
    #[error("firstnames do not match")]
    Firstnames,
    #[error("surname does not match")]
    Surname,
    #[error("date of birth does not match")]
    DateOfBirth,
    #[error("reference number does not match an eligible test")]
    ReferenceNumber,
}

impl MismatchCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchCause::Firstnames => "firstnames",
            MismatchCause::Surname => "surname",
            MismatchCause::DateOfBirth => "date_of_birth",
            MismatchCause::ReferenceNumber => "reference_number",
        }
    }
}

/// Every identity field that failed to match, reported together.
///
/// The display text never says which field failed; the causes are for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Candidate details do not match the licence record")]
pub struct IdentityMismatch {
    causes: Vec<MismatchCause>,
}

impl IdentityMismatch {
    pub(crate) fn new(causes: Vec<MismatchCause>) -> Self {
        Self { causes }
    }

    pub fn causes(&self) -> &[MismatchCause] {
        &self.causes
    }
}

/// Errors that end a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Submitted identity does not match the eligibility record.
    #[error(transparent)]
    IdentityMismatch(#[from] IdentityMismatch),

    /// Candidate has nothing they may book online.
    #[error("Candidate is not eligible to book online")]
    NotEligible,

    /// The eligibility service failed.
    #[error("Eligibility error: {0}")]
    Eligibility(#[from] EligibilityError),

    /// The CRM is rate limiting us.
    #[error("CRM is rate limiting requests")]
    TooManyRequests,

    /// The CRM failed with a server error.
    #[error("CRM server error (status {0})")]
    ServerError(u16),

    /// Any other CRM failure while reading, creating or updating records.
    #[error("Failed to create or update CRM records during {operation}")]
    CrmFailure { operation: CrmOperation },

    /// A new candidate cannot be registered without an address.
    #[error("Candidate has no address on record")]
    MissingAddress,

    /// Candidate belongs to the other jurisdiction's agency.
    #[error("Candidate is registered with {recorded}, not {selected}")]
    AgencyMismatch { recorded: Agency, selected: Agency },

    /// A stage ran before the eligibility record was fetched.
    #[error("Verification reached {stage} without an eligibility record")]
    InvalidStage { stage: VerificationStage },
}

impl ReconcileError {
    /// Classifies a CRM failure.
    ///
    /// 429 and 5xx stay distinguishable so callers can offer a retry; any
    /// other failure collapses into [`ReconcileError::CrmFailure`] and its
    /// cause is only logged.
    pub fn from_crm(operation: CrmOperation, error: CrmStoreError) -> Self {
        metrics::counter!("crm_failures_total", "operation" => operation.as_str()).increment(1);
        match error.status {
            Some(429) => {
                tracing::warn!(%operation, "CRM rate limited");
                ReconcileError::TooManyRequests
            }
            Some(status @ 500..=599) => {
                tracing::warn!(%operation, status, "CRM server error");
                ReconcileError::ServerError(status)
            }
            _ => {
                tracing::error!(%operation, cause = %error, "CRM request failed");
                ReconcileError::CrmFailure { operation }
            }
        }
    }

    /// Returns true if the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReconcileError::TooManyRequests | ReconcileError::ServerError(_) => true,
            ReconcileError::Eligibility(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Returns false for failures that go to the generic failure path.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReconcileError::Eligibility(err) => err.is_recoverable(),
            ReconcileError::CrmFailure { .. }
            | ReconcileError::MissingAddress
            | ReconcileError::AgencyMismatch { .. }
            | ReconcileError::InvalidStage { .. } => false,
            _ => true,
        }
    }
}

/// Convenience type alias for reconciler results.
pub type Result<T> = std::result::Result<T, ReconcileError>;
