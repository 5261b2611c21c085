//! In-memory eligibility transport for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TransportError;
use crate::payload::{EligibilityRequest, EligibilityResponse};
use crate::service::EligibilityTransport;

#[derive(Debug, Default)]
struct InMemoryEligibilityState {
    records: HashMap<String, EligibilityResponse>,
    requests: Vec<EligibilityRequest>,
    fail_with: Option<TransportError>,
}

/// Serves canned responses keyed by normalized licence number.
///
/// Unknown licences answer with a 404, as the real service does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEligibilityTransport {
    state: Arc<RwLock<InMemoryEligibilityState>>,
}

impl InMemoryEligibilityTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response for a licence number.
    pub async fn insert(&self, licence_number: &str, response: EligibilityResponse) {
        self.state
            .write()
            .await
            .records
            .insert(licence_number.to_ascii_uppercase(), response);
    }

    /// Makes every subsequent fetch fail with `error` until cleared.
    pub async fn set_failure(&self, error: Option<TransportError>) {
        self.state.write().await.fail_with = error;
    }

    /// Returns every request received so far.
    pub async fn requests(&self) -> Vec<EligibilityRequest> {
        self.state.read().await.requests.clone()
    }
}

#[async_trait]
impl EligibilityTransport for InMemoryEligibilityTransport {
    async fn fetch(
        &self,
        request: &EligibilityRequest,
    ) -> Result<EligibilityResponse, TransportError> {
        let mut state = self.state.write().await;
        state.requests.push(request.clone());

        if let Some(error) = &state.fail_with {
            return Err(error.clone());
        }

        state
            .records
            .get(request.licence_number.as_str())
            .cloned()
            .ok_or_else(|| TransportError::new(Some(404), "licence not found"))
    }
}
