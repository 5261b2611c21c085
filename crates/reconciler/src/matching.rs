//! Identity matching between submitted details and the eligibility record.

use common::{Journey, Jurisdiction};
use domain::{Candidate, CandidateDetails};

use crate::error::{IdentityMismatch, MismatchCause};

/// Firstnames the GB agency returns when a candidate's names are withheld.
pub const REDACTED_FIRSTNAMES_PLACEHOLDER: &str = "---";

/// Collects every failed check instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct MismatchCollector {
    causes: Vec<MismatchCause>,
}

impl MismatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `cause` unless `matched` holds.
    pub fn check(mut self, matched: bool, cause: MismatchCause) -> Self {
        if !matched {
            self.causes.push(cause);
        }
        self
    }

    pub fn finish(self) -> Result<(), IdentityMismatch> {
        if self.causes.is_empty() {
            Ok(())
        } else {
            Err(IdentityMismatch::new(self.causes))
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn names_match(submitted: &str, recorded: &str) -> bool {
    normalize(submitted) == normalize(recorded)
}

fn firstnames_match(submitted: &str, recorded: &str, jurisdiction: Jurisdiction) -> bool {
    let submitted = submitted.trim();
    if jurisdiction.is_primary()
        && (submitted.is_empty() || submitted == "-")
        && recorded.trim() == REDACTED_FIRSTNAMES_PLACEHOLDER
    {
        return true;
    }
    names_match(submitted, recorded)
}

fn reference_matches(
    details: &CandidateDetails,
    candidate: &Candidate,
    jurisdiction: Jurisdiction,
) -> bool {
    let Some(submitted) = &details.reference_number else {
        return false;
    };
    candidate
        .eligible_entries()
        .filter_map(|entry| entry.reference_for(jurisdiction))
        .any(|recorded| recorded.trim() == submitted.as_str())
}

/// Compares the submitted identity with the eligibility record.
///
/// Firstnames, surname and date of birth are always checked; instructors
/// must also supply a reference number held by one of their eligible tests.
/// Every failing field is reported in the returned [`IdentityMismatch`].
pub fn does_candidate_match_eligibility(
    details: &CandidateDetails,
    candidate: &Candidate,
    journey: Journey,
    jurisdiction: Jurisdiction,
) -> Result<(), IdentityMismatch> {
    let collector = MismatchCollector::new()
        .check(
            firstnames_match(&details.firstnames, &candidate.firstnames, jurisdiction),
            MismatchCause::Firstnames,
        )
        .check(
            names_match(&details.surname, &candidate.surname),
            MismatchCause::Surname,
        )
        .check(
            details.date_of_birth.to_iso_date_string()
                == candidate.date_of_birth.to_iso_date_string(),
            MismatchCause::DateOfBirth,
        );

    let collector = if journey.is_instructor() {
        collector.check(
            reference_matches(details, candidate, jurisdiction),
            MismatchCause::ReferenceNumber,
        )
    } else {
        collector
    };

    collector.finish()
}
