//! Eligibility service traits and the transport-backed adapter.

use async_trait::async_trait;
use common::{Jurisdiction, Locale};
use domain::{Candidate, LicenceNumber};

use crate::error::{EligibilityError, TransportError};
use crate::mapping::map_response;
use crate::payload::{EligibilityRequest, EligibilityResponse};

/// Anything that can answer "what may this licence holder book?".
#[async_trait]
pub trait EligibilityService: Send + Sync {
    /// Fetches the candidate projection for a licence.
    async fn get_eligibility(
        &self,
        licence_number: &LicenceNumber,
        is_manage_booking: bool,
        jurisdiction: Jurisdiction,
        locale: Locale,
    ) -> Result<Candidate, EligibilityError>;
}

/// Raw access to the remote eligibility service (HTTP client, retries, auth).
#[async_trait]
pub trait EligibilityTransport: Send + Sync {
    async fn fetch(
        &self,
        request: &EligibilityRequest,
    ) -> Result<EligibilityResponse, TransportError>;
}

/// Turns transport responses into candidate projections and transport
/// failures into [`EligibilityError`]s.
#[derive(Debug, Clone)]
pub struct EligibilityAdapter<T: EligibilityTransport> {
    transport: T,
}

impl<T: EligibilityTransport> EligibilityAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: EligibilityTransport> EligibilityService for EligibilityAdapter<T> {
    #[tracing::instrument(
        skip_all,
        fields(jurisdiction = %jurisdiction, locale = %locale, manage_booking = is_manage_booking)
    )]
    async fn get_eligibility(
        &self,
        licence_number: &LicenceNumber,
        is_manage_booking: bool,
        jurisdiction: Jurisdiction,
        locale: Locale,
    ) -> Result<Candidate, EligibilityError> {
        metrics::counter!("eligibility_requests_total").increment(1);
        let request = EligibilityRequest {
            licence_number: licence_number.clone(),
            is_manage_booking,
            jurisdiction,
            locale,
        };

        let response = match self.transport.fetch(&request).await {
            Ok(response) => response,
            Err(transport_error) => {
                let status = transport_error.status;
                let error = EligibilityError::from(transport_error);
                if error.is_recoverable() {
                    tracing::warn!(?status, %error, "eligibility request failed");
                } else {
                    tracing::error!(?status, %error, "eligibility request rejected");
                }
                metrics::counter!("eligibility_failures_total").increment(1);
                return Err(error);
            }
        };

        let candidate = map_response(response, request.licence_number)?;
        tracing::debug!(
            eligibilities = candidate.eligibilities.len(),
            eligible_to_book_online = candidate.eligible_to_book_online,
            "eligibility retrieved"
        );
        Ok(candidate)
    }
}
