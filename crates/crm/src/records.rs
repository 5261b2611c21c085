//! Records held by the CRM store and their mapping from the candidate projection.

use common::CrmId;
use domain::{Address, Candidate};
use serde::{Deserialize, Serialize};

/// Address fields as the CRM stores them on a licence record.
///
/// The CRM has four address lines and a town; the agency's fifth line is
/// the town.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub line4: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
}

impl CrmAddress {
    /// Fields in a fixed order, for field-by-field comparison.
    pub fn fields(&self) -> [&Option<String>; 6] {
        [
            &self.line1,
            &self.line2,
            &self.line3,
            &self.line4,
            &self.city,
            &self.postcode,
        ]
    }
}

impl From<&Address> for CrmAddress {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            line3: address.line3.clone(),
            line4: address.line4.clone(),
            city: address.line5.clone(),
            postcode: address.postcode.clone(),
        }
    }
}

/// Candidate attributes the CRM mirrors from the eligibility record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmCandidateFields {
    pub firstnames: Option<String>,
    pub surname: Option<String>,
    /// `YYYY-MM-DD`.
    pub birthdate: Option<String>,
    /// Always lower-cased.
    pub title: Option<String>,
    pub gender: Option<String>,
}

impl CrmCandidateFields {
    pub fn fields(&self) -> [&Option<String>; 5] {
        [
            &self.firstnames,
            &self.surname,
            &self.birthdate,
            &self.title,
            &self.gender,
        ]
    }
}

impl From<&Candidate> for CrmCandidateFields {
    fn from(candidate: &Candidate) -> Self {
        Self {
            firstnames: Some(candidate.firstnames.clone()),
            surname: Some(candidate.surname.clone()),
            birthdate: Some(candidate.date_of_birth.to_iso_date_string()),
            title: candidate.title.as_ref().map(|title| title.to_lowercase()),
            gender: candidate.gender.clone(),
        }
    }
}

/// A candidate (contact) record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmCandidateRecord {
    pub candidate_id: CrmId,
    /// CRM-assigned candidate reference shown to staff.
    pub person_reference: Option<String>,
    pub fields: CrmCandidateFields,
}

/// A licence record linked to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmLicenceRecord {
    pub licence_id: CrmId,
    pub licence_number: String,
    pub candidate_id: CrmId,
    pub address: CrmAddress,
}

/// A licence joined with its candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmLicenceCandidate {
    pub licence: CrmLicenceRecord,
    pub candidate: CrmCandidateRecord,
}
