//! In-memory CRM store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CrmId;
use domain::{Address, Candidate, LicenceNumber};
use tokio::sync::RwLock;

use crate::error::CrmStoreError;
use crate::records::{
    CrmAddress, CrmCandidateFields, CrmCandidateRecord, CrmLicenceCandidate, CrmLicenceRecord,
};
use crate::store::{CrmOperation, CrmStore};

#[derive(Debug, Default)]
struct InMemoryCrmState {
    candidates: HashMap<CrmId, CrmCandidateRecord>,
    licences: HashMap<CrmId, CrmLicenceRecord>,
    calls: Vec<CrmOperation>,
    failures: HashMap<CrmOperation, CrmStoreError>,
    next_reference: u32,
}

impl InMemoryCrmState {
    /// Records the call and returns the injected failure for it, if any.
    fn record(&mut self, operation: CrmOperation) -> Result<(), CrmStoreError> {
        self.calls.push(operation);
        match self.failures.get(&operation) {
            Some(error) => {
                tracing::debug!(%operation, %error, "injected CRM failure");
                Err(error.clone())
            }
            None => {
                tracing::trace!(%operation, "CRM call");
                Ok(())
            }
        }
    }
}

/// In-memory CRM store that logs every call it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrmStore {
    state: Arc<RwLock<InMemoryCrmState>>,
}

impl InMemoryCrmStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call of `operation` fail with `error`.
    pub async fn fail_on(&self, operation: CrmOperation, error: CrmStoreError) {
        self.state.write().await.failures.insert(operation, error);
    }

    /// Removes all injected failures.
    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    /// Returns every call received so far, in order.
    pub async fn calls(&self) -> Vec<CrmOperation> {
        self.state.read().await.calls.clone()
    }

    /// Returns the write calls received so far, in order.
    pub async fn writes(&self) -> Vec<CrmOperation> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .copied()
            .filter(CrmOperation::is_write)
            .collect()
    }

    /// Forgets the call log, keeping records.
    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    /// Stores a candidate record directly, bypassing the call log.
    pub async fn seed_candidate(&self, record: CrmCandidateRecord) {
        self.state
            .write()
            .await
            .candidates
            .insert(record.candidate_id, record);
    }

    /// Stores a licence record directly, bypassing the call log.
    pub async fn seed_licence(&self, record: CrmLicenceRecord) {
        self.state
            .write()
            .await
            .licences
            .insert(record.licence_id, record);
    }

    pub async fn candidate(&self, candidate_id: CrmId) -> Option<CrmCandidateRecord> {
        self.state.read().await.candidates.get(&candidate_id).cloned()
    }

    pub async fn licence(&self, licence_id: CrmId) -> Option<CrmLicenceRecord> {
        self.state.read().await.licences.get(&licence_id).cloned()
    }

    pub async fn candidate_count(&self) -> usize {
        self.state.read().await.candidates.len()
    }

    pub async fn licence_count(&self) -> usize {
        self.state.read().await.licences.len()
    }
}

#[async_trait]
impl CrmStore for InMemoryCrmStore {
    async fn get_licence_and_candidate(
        &self,
        candidate_id: CrmId,
        licence_number: &LicenceNumber,
    ) -> Result<Option<CrmLicenceCandidate>, CrmStoreError> {
        let mut state = self.state.write().await;
        state.record(CrmOperation::GetLicenceAndCandidate)?;

        let Some(licence) = state
            .licences
            .values()
            .find(|l| l.candidate_id == candidate_id && licence_number.matches(&l.licence_number))
            .cloned()
        else {
            return Ok(None);
        };

        Ok(state
            .candidates
            .get(&candidate_id)
            .cloned()
            .map(|candidate| CrmLicenceCandidate { licence, candidate }))
    }

    async fn create_candidate(&self, candidate: &Candidate) -> Result<CrmId, CrmStoreError> {
        let mut state = self.state.write().await;
        state.record(CrmOperation::CreateCandidate)?;

        state.next_reference += 1;
        let candidate_id = CrmId::new();
        let record = CrmCandidateRecord {
            candidate_id,
            person_reference: Some(format!("C-{:06}", state.next_reference)),
            fields: CrmCandidateFields::from(candidate),
        };
        state.candidates.insert(candidate_id, record);
        Ok(candidate_id)
    }

    async fn create_licence(
        &self,
        licence_number: &LicenceNumber,
        address: &Address,
        candidate_id: CrmId,
    ) -> Result<CrmId, CrmStoreError> {
        let mut state = self.state.write().await;
        state.record(CrmOperation::CreateLicence)?;

        if !state.candidates.contains_key(&candidate_id) {
            return Err(CrmStoreError::not_found(format!("candidate {candidate_id}")));
        }

        let licence_id = CrmId::new();
        state.licences.insert(
            licence_id,
            CrmLicenceRecord {
                licence_id,
                licence_number: licence_number.to_string(),
                candidate_id,
                address: CrmAddress::from(address),
            },
        );
        Ok(licence_id)
    }

    async fn update_candidate(
        &self,
        candidate_id: CrmId,
        candidate: &Candidate,
    ) -> Result<CrmCandidateRecord, CrmStoreError> {
        let mut state = self.state.write().await;
        state.record(CrmOperation::UpdateCandidate)?;

        let record = state
            .candidates
            .get_mut(&candidate_id)
            .ok_or_else(|| CrmStoreError::not_found(format!("candidate {candidate_id}")))?;
        record.fields = CrmCandidateFields::from(candidate);
        Ok(record.clone())
    }

    async fn update_licence(
        &self,
        licence_id: CrmId,
        candidate_id: CrmId,
        address: &Address,
    ) -> Result<(), CrmStoreError> {
        let mut state = self.state.write().await;
        state.record(CrmOperation::UpdateLicence)?;

        let licence = state
            .licences
            .get_mut(&licence_id)
            .ok_or_else(|| CrmStoreError::not_found(format!("licence {licence_id}")))?;
        licence.candidate_id = candidate_id;
        licence.address = CrmAddress::from(address);
        Ok(())
    }
}
