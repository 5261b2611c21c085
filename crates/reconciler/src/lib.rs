//! Identity and eligibility reconciliation.
//!
//! [`IdentityReconciler`] checks a candidate's submitted identity against
//! the eligibility service, gates what they may book, then registers or
//! aligns their CRM records. Matching collects every failing field before
//! reporting, and alignment writes only what changed.

pub mod alignment;
pub mod config;
pub mod error;
pub mod gate;
pub mod matching;
pub mod reconciler;
pub mod stage;
pub mod telemetry;

pub use alignment::{AlignmentPlan, align_known_candidate, plan_alignment, register_new_candidate};
pub use config::{Config, LogFormat};
pub use error::{IdentityMismatch, MismatchCause, ReconcileError, Result};
pub use gate::{ensure_agency, ensure_citizen_eligible, ensure_instructor_eligible};
pub use matching::{
    MismatchCollector, REDACTED_FIRSTNAMES_PLACEHOLDER, does_candidate_match_eligibility,
};
pub use reconciler::{IdentityReconciler, VerificationRequest};
pub use stage::VerificationStage;
pub use telemetry::{TelemetryError, init_tracing};
