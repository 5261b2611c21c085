//! Verification stage machine.

use common::Journey;
use serde::{Deserialize, Serialize};

/// The stage a verification attempt has reached.
///
/// Stage order per journey:
/// ```text
/// citizen:    FetchEligibility ──► MatchIdentity ──► EligibilityGate ──► ReconcileCrm ──► Done
/// instructor: FetchEligibility ──► InstructorGate ──► MatchIdentity ──► ReconcileCrm ──► Done
/// ```
/// Any stage may end the attempt with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VerificationStage {
    /// Waiting on the eligibility service.
    #[default]
    FetchEligibility,

    /// Instructors must hold an instructor test before identity is checked.
    InstructorGate,

    /// Submitted details compared against the eligibility record.
    MatchIdentity,

    /// Citizens must hold a bookable test after identity is checked.
    EligibilityGate,

    /// Writing to the CRM.
    ReconcileCrm,

    /// Candidate verified and reconciled.
    Done,
}

const CITIZEN_STAGES: [VerificationStage; 5] = [
    VerificationStage::FetchEligibility,
    VerificationStage::MatchIdentity,
    VerificationStage::EligibilityGate,
    VerificationStage::ReconcileCrm,
    VerificationStage::Done,
];

const INSTRUCTOR_STAGES: [VerificationStage; 5] = [
    VerificationStage::FetchEligibility,
    VerificationStage::InstructorGate,
    VerificationStage::MatchIdentity,
    VerificationStage::ReconcileCrm,
    VerificationStage::Done,
];

impl VerificationStage {
    /// The stages a journey passes through, in order.
    pub fn sequence(journey: Journey) -> &'static [VerificationStage] {
        match journey {
            Journey::Citizen => &CITIZEN_STAGES,
            Journey::Instructor => &INSTRUCTOR_STAGES,
        }
    }

    /// Returns the stage name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStage::FetchEligibility => "FetchEligibility",
            VerificationStage::InstructorGate => "InstructorGate",
            VerificationStage::MatchIdentity => "MatchIdentity",
            VerificationStage::EligibilityGate => "EligibilityGate",
            VerificationStage::ReconcileCrm => "ReconcileCrm",
            VerificationStage::Done => "Done",
        }
    }
}

impl std::fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
