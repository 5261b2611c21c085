//! The CRM store interface.

use async_trait::async_trait;
use common::CrmId;
use domain::{Address, Candidate, LicenceNumber};
use serde::{Deserialize, Serialize};

use crate::error::CrmStoreError;
use crate::records::{CrmCandidateRecord, CrmLicenceCandidate};

/// Calls the reconciler makes against the CRM store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrmOperation {
    GetLicenceAndCandidate,
    CreateCandidate,
    CreateLicence,
    UpdateCandidate,
    UpdateLicence,
}

impl CrmOperation {
    /// Returns true for calls that change CRM state.
    pub fn is_write(&self) -> bool {
        !matches!(self, CrmOperation::GetLicenceAndCandidate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrmOperation::GetLicenceAndCandidate => "get_licence_and_candidate",
            CrmOperation::CreateCandidate => "create_candidate",
            CrmOperation::CreateLicence => "create_licence",
            CrmOperation::UpdateCandidate => "update_candidate",
            CrmOperation::UpdateLicence => "update_licence",
        }
    }
}

impl std::fmt::Display for CrmOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read/write access to candidate and licence records in the CRM.
#[async_trait]
pub trait CrmStore: Send + Sync {
    /// Reads the licence record for `licence_number` owned by `candidate_id`,
    /// joined with the candidate record.
    async fn get_licence_and_candidate(
        &self,
        candidate_id: CrmId,
        licence_number: &LicenceNumber,
    ) -> Result<Option<CrmLicenceCandidate>, CrmStoreError>;

    /// Creates a candidate record and returns its id.
    async fn create_candidate(&self, candidate: &Candidate) -> Result<CrmId, CrmStoreError>;

    /// Creates a licence record for a candidate and returns its id.
    async fn create_licence(
        &self,
        licence_number: &LicenceNumber,
        address: &Address,
        candidate_id: CrmId,
    ) -> Result<CrmId, CrmStoreError>;

    /// Overwrites the candidate's mirrored attributes.
    async fn update_candidate(
        &self,
        candidate_id: CrmId,
        candidate: &Candidate,
    ) -> Result<CrmCandidateRecord, CrmStoreError>;

    /// Overwrites the address on a licence record.
    async fn update_licence(
        &self,
        licence_id: CrmId,
        candidate_id: CrmId,
        address: &Address,
    ) -> Result<(), CrmStoreError>;
}
