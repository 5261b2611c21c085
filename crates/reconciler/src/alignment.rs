//! CRM alignment.
//!
//! Keeps the CRM candidate and licence records in line with the eligibility
//! projection, writing only when something differs. The address lives on
//! both records, so an address change refreshes the candidate as well as
//! the licence.

use common::CrmId;
use crm::{CrmAddress, CrmCandidateFields, CrmLicenceCandidate, CrmOperation, CrmStore};
use domain::{Address, Candidate};

use crate::error::{ReconcileError, Result};

/// The writes needed to bring the CRM in line with a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentPlan {
    pub create_licence: bool,
    pub update_licence: bool,
    pub update_candidate: bool,
}

impl AlignmentPlan {
    /// Returns true when the CRM already matches.
    pub fn is_noop(&self) -> bool {
        !(self.create_licence || self.update_licence || self.update_candidate)
    }
}

/// `None` and the empty string are the same value to the CRM.
fn same_field(left: &Option<String>, right: &Option<String>) -> bool {
    left.as_deref().unwrap_or_default() == right.as_deref().unwrap_or_default()
}

fn fields_differ<'a>(
    left: impl IntoIterator<Item = &'a Option<String>>,
    right: impl IntoIterator<Item = &'a Option<String>>,
) -> bool {
    left.into_iter()
        .zip(right)
        .any(|(left, right)| !same_field(left, right))
}

fn address_of(candidate: &Candidate) -> Address {
    candidate.address.clone().unwrap_or_default()
}

/// Works out which writes `candidate` needs given the current CRM record.
pub fn plan_alignment(
    existing: Option<&CrmLicenceCandidate>,
    candidate: &Candidate,
) -> AlignmentPlan {
    let Some(existing) = existing else {
        return AlignmentPlan {
            create_licence: true,
            update_licence: false,
            update_candidate: true,
        };
    };

    let address = CrmAddress::from(&address_of(candidate));
    let address_changed = fields_differ(address.fields(), existing.licence.address.fields());

    let wanted = CrmCandidateFields::from(candidate);
    let recorded = CrmCandidateFields {
        title: existing
            .candidate
            .fields
            .title
            .as_ref()
            .map(|title| title.to_lowercase()),
        ..existing.candidate.fields.clone()
    };
    let core_changed = fields_differ(wanted.fields(), recorded.fields());

    AlignmentPlan {
        create_licence: false,
        update_licence: address_changed,
        update_candidate: address_changed || core_changed,
    }
}

fn record_write(operation: CrmOperation) {
    metrics::counter!("crm_writes_total", "operation" => operation.as_str()).increment(1);
    tracing::debug!(%operation, "CRM write");
}

/// Registers a candidate the CRM has never seen.
///
/// Creates the candidate record, then the licence record linked to it.
#[tracing::instrument(skip_all)]
pub async fn register_new_candidate<C: CrmStore>(
    crm: &C,
    candidate: &Candidate,
) -> Result<Candidate> {
    let Some(address) = candidate.address.as_ref().filter(|_| candidate.has_address()) else {
        tracing::error!("cannot register a candidate without an address");
        return Err(ReconcileError::MissingAddress);
    };

    let candidate_id = crm
        .create_candidate(candidate)
        .await
        .map_err(|err| ReconcileError::from_crm(CrmOperation::CreateCandidate, err))?;
    record_write(CrmOperation::CreateCandidate);

    let licence_id = crm
        .create_licence(&candidate.licence_number, address, candidate_id)
        .await
        .map_err(|err| ReconcileError::from_crm(CrmOperation::CreateLicence, err))?;
    record_write(CrmOperation::CreateLicence);

    tracing::info!(%candidate_id, %licence_id, "candidate registered in CRM");
    Ok(Candidate {
        candidate_id: Some(candidate_id),
        licence_id: Some(licence_id),
        ..candidate.clone()
    })
}

/// Aligns the CRM records of a candidate it already knows.
#[tracing::instrument(skip(crm, candidate))]
pub async fn align_known_candidate<C: CrmStore>(
    crm: &C,
    candidate: &Candidate,
    candidate_id: CrmId,
) -> Result<Candidate> {
    let existing = crm
        .get_licence_and_candidate(candidate_id, &candidate.licence_number)
        .await
        .map_err(|err| ReconcileError::from_crm(CrmOperation::GetLicenceAndCandidate, err))?;

    let plan = plan_alignment(existing.as_ref(), candidate);
    let address = address_of(candidate);
    let mut aligned = Candidate {
        candidate_id: Some(candidate_id),
        ..candidate.clone()
    };

    if let Some(existing) = &existing {
        aligned.licence_id = Some(existing.licence.licence_id);
        aligned.person_reference = existing.candidate.person_reference.clone();
    }

    if plan.is_noop() {
        tracing::debug!("CRM already aligned");
        return Ok(aligned);
    }

    if plan.create_licence {
        let licence_id = crm
            .create_licence(&candidate.licence_number, &address, candidate_id)
            .await
            .map_err(|err| ReconcileError::from_crm(CrmOperation::CreateLicence, err))?;
        record_write(CrmOperation::CreateLicence);
        aligned.licence_id = Some(licence_id);
    }

    if plan.update_licence
        && let Some(existing) = &existing
    {
        crm.update_licence(existing.licence.licence_id, candidate_id, &address)
            .await
            .map_err(|err| ReconcileError::from_crm(CrmOperation::UpdateLicence, err))?;
        record_write(CrmOperation::UpdateLicence);
    }

    if plan.update_candidate {
        let updated = crm
            .update_candidate(candidate_id, &aligned)
            .await
            .map_err(|err| ReconcileError::from_crm(CrmOperation::UpdateCandidate, err))?;
        record_write(CrmOperation::UpdateCandidate);
        if updated.person_reference.is_some() {
            aligned.person_reference = updated.person_reference;
        }
    }

    tracing::info!(
        create_licence = plan.create_licence,
        update_licence = plan.update_licence,
        update_candidate = plan.update_candidate,
        "CRM aligned"
    );
    Ok(aligned)
}
