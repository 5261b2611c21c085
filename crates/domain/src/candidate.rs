//! The candidate projection built from an eligibility response.

use common::{CrmId, Jurisdiction};
use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::licence::LicenceNumber;
use crate::reference::ReferenceNumber;
use crate::test_type::TestType;

/// Postal address as held by the licensing agency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub line4: Option<String>,
    pub line5: Option<String>,
    pub postcode: Option<String>,
}

impl Address {
    /// Returns true when no line carries any non-blank text.
    pub fn is_empty(&self) -> bool {
        [
            &self.line1,
            &self.line2,
            &self.line3,
            &self.line4,
            &self.line5,
            &self.postcode,
        ]
        .into_iter()
        .all(|line| line.as_deref().is_none_or(|text| text.trim().is_empty()))
    }
}

/// One test type a candidate may (or may not) book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub test_type: TestType,
    pub eligible: bool,
    pub eligible_from: Option<CalendarDate>,
    pub eligible_to: Option<CalendarDate>,
    pub personal_reference_number: Option<String>,
    pub payment_receipt_number: Option<String>,
}

impl Eligibility {
    pub fn new(test_type: TestType, eligible: bool) -> Self {
        Self {
            test_type,
            eligible,
            eligible_from: None,
            eligible_to: None,
            personal_reference_number: None,
            payment_receipt_number: None,
        }
    }

    /// The reference field instructors are identified by in a jurisdiction.
    pub fn reference_for(&self, jurisdiction: Jurisdiction) -> Option<&str> {
        match jurisdiction {
            Jurisdiction::GreatBritain => self.personal_reference_number.as_deref(),
            Jurisdiction::NorthernIreland => self.payment_receipt_number.as_deref(),
        }
    }
}

/// A candidate as known to the eligibility service, enriched with CRM ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: Option<CrmId>,
    pub licence_id: Option<CrmId>,
    pub person_reference: Option<String>,
    pub licence_number: LicenceNumber,
    pub firstnames: String,
    pub surname: String,
    pub date_of_birth: CalendarDate,
    pub title: Option<String>,
    pub gender: Option<String>,
    pub address: Option<Address>,
    pub eligibilities: Vec<Eligibility>,
    pub eligible_to_book_online: bool,
}

impl Candidate {
    /// Eligible entries only.
    pub fn eligible_entries(&self) -> impl Iterator<Item = &Eligibility> {
        self.eligibilities.iter().filter(|e| e.eligible)
    }

    /// Test types the candidate can book.
    pub fn bookable_test_types(&self) -> Vec<TestType> {
        self.eligible_entries().map(|e| e.test_type).collect()
    }

    /// Returns true if the address is present and not blank.
    pub fn has_address(&self) -> bool {
        self.address.as_ref().is_some_and(|address| !address.is_empty())
    }
}

/// Identity details submitted by the person booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetails {
    pub licence_number: LicenceNumber,
    pub firstnames: String,
    pub surname: String,
    pub date_of_birth: CalendarDate,
    pub reference_number: Option<ReferenceNumber>,
}

impl CandidateDetails {
    pub fn new(
        licence_number: LicenceNumber,
        firstnames: impl Into<String>,
        surname: impl Into<String>,
        date_of_birth: CalendarDate,
    ) -> Self {
        Self {
            licence_number,
            firstnames: firstnames.into(),
            surname: surname.into(),
            date_of_birth,
            reference_number: None,
        }
    }

    pub fn with_reference(mut self, reference: ReferenceNumber) -> Self {
        self.reference_number = Some(reference);
        self
    }
}
