//! Eligibility gates.
//!
//! Instructors are gated before their identity is checked and citizens
//! after; see [`crate::VerificationStage::sequence`].

use common::{Agency, Journey, Jurisdiction};
use domain::Candidate;

use crate::error::{ReconcileError, Result};

fn reject(journey: Journey) -> ReconcileError {
    metrics::counter!("eligibility_gate_rejections_total", "journey" => journey.as_str())
        .increment(1);
    tracing::info!(%journey, "candidate not eligible to book online");
    ReconcileError::NotEligible
}

/// Requires an eligible instructor test the candidate may book online.
pub fn ensure_instructor_eligible(candidate: &Candidate) -> Result<()> {
    let has_instructor_test = candidate
        .eligible_entries()
        .any(|entry| entry.test_type.is_instructor());

    if has_instructor_test && candidate.eligible_to_book_online {
        Ok(())
    } else {
        Err(reject(Journey::Instructor))
    }
}

/// Requires at least one eligible citizen test the candidate may book online.
pub fn ensure_citizen_eligible(candidate: &Candidate) -> Result<()> {
    let has_citizen_test = candidate
        .eligible_entries()
        .any(|entry| !entry.test_type.is_instructor());

    if has_citizen_test && candidate.eligible_to_book_online {
        Ok(())
    } else {
        Err(reject(Journey::Citizen))
    }
}

/// Rejects a managed booking made under the other agency's jurisdiction.
///
/// A candidate with no recorded agency passes.
pub fn ensure_agency(recorded: Option<Agency>, selected: Jurisdiction) -> Result<()> {
    match recorded {
        Some(recorded) if recorded != selected.agency() => {
            tracing::error!(%recorded, selected = %selected.agency(), "agency mismatch");
            Err(ReconcileError::AgencyMismatch {
                recorded,
                selected: selected.agency(),
            })
        }
        _ => Ok(()),
    }
}
