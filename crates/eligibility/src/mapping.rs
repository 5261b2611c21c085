//! Maps an eligibility response onto the candidate projection.

use domain::{Address, CalendarDate, Candidate, Eligibility, LicenceNumber, TestType};

use crate::error::EligibilityError;
use crate::payload::{EligibilityResponse, RemoteAddress, RemoteEligibility};

/// Builds the candidate projection for `licence_number` from a response.
///
/// Entries with a test type we do not book are dropped with a warning; the
/// rest of the response still maps. Unreadable dates are a retrieve error.
pub fn map_response(
    response: EligibilityResponse,
    licence_number: LicenceNumber,
) -> Result<Candidate, EligibilityError> {
    let date_of_birth = CalendarDate::parse(&response.date_of_birth)
        .map_err(|_| EligibilityError::RetrieveError("malformed dateOfBirth".to_string()))?;

    let mut eligibilities = Vec::with_capacity(response.eligibilities.len());
    for remote in response.eligibilities {
        if let Some(eligibility) = map_eligibility(remote)? {
            eligibilities.push(eligibility);
        }
    }

    Ok(Candidate {
        candidate_id: None,
        licence_id: None,
        person_reference: None,
        licence_number,
        firstnames: response.first_names,
        surname: response.surname,
        date_of_birth,
        title: response.title,
        gender: response.gender,
        address: response.address.map(map_address),
        eligibilities,
        eligible_to_book_online: response.eligible_to_book_online,
    })
}

fn map_eligibility(remote: RemoteEligibility) -> Result<Option<Eligibility>, EligibilityError> {
    let Some(test_type) = TestType::from_remote(&remote.test_type) else {
        tracing::warn!(test_type = %remote.test_type, "dropping eligibility with unmapped test type");
        metrics::counter!("eligibility_test_types_dropped_total").increment(1);
        return Ok(None);
    };

    Ok(Some(Eligibility {
        test_type,
        eligible: remote.eligible,
        eligible_from: optional_date(remote.eligible_from.as_deref(), "eligibleFrom")?,
        eligible_to: optional_date(remote.eligible_to.as_deref(), "eligibleTo")?,
        personal_reference_number: remote.personal_reference_number,
        payment_receipt_number: remote.payment_receipt_number,
    }))
}

fn optional_date(
    value: Option<&str>,
    field: &str,
) -> Result<Option<CalendarDate>, EligibilityError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => CalendarDate::parse(text)
            .map(Some)
            .map_err(|_| EligibilityError::RetrieveError(format!("malformed {field}"))),
    }
}

fn map_address(remote: RemoteAddress) -> Address {
    Address {
        line1: remote.line1,
        line2: remote.line2,
        line3: remote.line3,
        line4: remote.line4,
        line5: remote.line5,
        postcode: remote.postcode,
    }
}
