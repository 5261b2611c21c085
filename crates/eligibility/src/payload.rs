//! Wire types exchanged with the eligibility service.

use common::{Jurisdiction, Locale};
use domain::LicenceNumber;
use serde::{Deserialize, Serialize};

/// A request for a licence holder's eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRequest {
    pub licence_number: LicenceNumber,
    /// Set when the candidate is managing an existing booking rather than
    /// making a new one.
    pub is_manage_booking: bool,
    pub jurisdiction: Jurisdiction,
    pub locale: Locale,
}

/// Body returned by the eligibility service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub first_names: String,
    pub surname: String,
    /// ISO date (or date-time) of birth.
    pub date_of_birth: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<RemoteAddress>,
    #[serde(default)]
    pub eligibilities: Vec<RemoteEligibility>,
    #[serde(default)]
    pub eligible_to_book_online: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAddress {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub line3: Option<String>,
    #[serde(default)]
    pub line4: Option<String>,
    #[serde(default)]
    pub line5: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEligibility {
    /// Remote test-type code, e.g. `"Car"` or `"ADI-P1"`.
    pub test_type: String,
    pub eligible: bool,
    #[serde(default)]
    pub eligible_from: Option<String>,
    #[serde(default)]
    pub eligible_to: Option<String>,
    #[serde(default)]
    pub personal_reference_number: Option<String>,
    #[serde(default)]
    pub payment_receipt_number: Option<String>,
}

impl RemoteEligibility {
    pub fn new(test_type: impl Into<String>, eligible: bool) -> Self {
        Self {
            test_type: test_type.into(),
            eligible,
            eligible_from: None,
            eligible_to: None,
            personal_reference_number: None,
            payment_receipt_number: None,
        }
    }
}
