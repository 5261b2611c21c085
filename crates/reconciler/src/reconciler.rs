//! Identity reconciler for verifying candidates against their eligibility record.

use common::{Agency, CrmId, Journey, Jurisdiction, Locale};
use crm::CrmStore;
use domain::{Candidate, CandidateDetails};
use eligibility::EligibilityService;

use crate::alignment::{align_known_candidate, register_new_candidate};
use crate::error::{ReconcileError, Result};
use crate::gate;
use crate::matching::does_candidate_match_eligibility;
use crate::stage::VerificationStage;

/// One verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub details: CandidateDetails,
    pub journey: Journey,
    pub jurisdiction: Jurisdiction,
    pub locale: Locale,
    pub is_manage_booking: bool,
    /// Agency on the booking being managed, if known.
    pub recorded_agency: Option<Agency>,
    /// CRM candidate id from an earlier verification, if any.
    pub candidate_id: Option<CrmId>,
}

impl VerificationRequest {
    pub fn new(details: CandidateDetails, journey: Journey, jurisdiction: Jurisdiction) -> Self {
        Self {
            details,
            journey,
            jurisdiction,
            locale: Locale::default(),
            is_manage_booking: false,
            recorded_agency: None,
            candidate_id: None,
        }
    }

    pub fn citizen(details: CandidateDetails, jurisdiction: Jurisdiction) -> Self {
        Self::new(details, Journey::Citizen, jurisdiction)
    }

    pub fn instructor(details: CandidateDetails, jurisdiction: Jurisdiction) -> Self {
        Self::new(details, Journey::Instructor, jurisdiction)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_candidate_id(mut self, candidate_id: CrmId) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }

    /// Marks the attempt as part of managing an existing booking.
    pub fn managing_booking(mut self, recorded_agency: Option<Agency>) -> Self {
        self.is_manage_booking = true;
        self.recorded_agency = recorded_agency;
        self
    }
}

/// Verifies a candidate's identity and eligibility and brings the CRM in
/// line with the eligibility record.
///
/// Holds nothing but the injected adapters, so one instance can serve
/// concurrent requests.
pub struct IdentityReconciler<E, C>
where
    E: EligibilityService,
    C: CrmStore,
{
    eligibility: E,
    crm: C,
}

impl<E, C> IdentityReconciler<E, C>
where
    E: EligibilityService,
    C: CrmStore,
{
    /// Creates a new reconciler.
    pub fn new(eligibility: E, crm: C) -> Self {
        Self { eligibility, crm }
    }

    pub fn eligibility(&self) -> &E {
        &self.eligibility
    }

    pub fn crm(&self) -> &C {
        &self.crm
    }

    /// Runs a verification attempt to completion.
    ///
    /// Returns the candidate projection carrying its CRM ids.
    #[tracing::instrument(
        skip_all,
        fields(
            journey = %request.journey,
            jurisdiction = %request.jurisdiction,
            manage_booking = request.is_manage_booking,
            known_candidate = request.candidate_id.is_some(),
        )
    )]
    pub async fn verify(&self, request: &VerificationRequest) -> Result<Candidate> {
        metrics::counter!("identity_verifications_total", "journey" => request.journey.as_str())
            .increment(1);
        let started = std::time::Instant::now();

        let result = self.run(request).await;

        metrics::histogram!("identity_verification_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        if let Err(error) = &result {
            tracing::info!(
                %error,
                retryable = error.is_retryable(),
                recoverable = error.is_recoverable(),
                "verification failed"
            );
        }
        result
    }

    async fn run(&self, request: &VerificationRequest) -> Result<Candidate> {
        if request.is_manage_booking {
            gate::ensure_agency(request.recorded_agency, request.jurisdiction)?;
        }

        let mut candidate = None;
        for &stage in VerificationStage::sequence(request.journey) {
            enter(stage);
            candidate = Some(match (stage, candidate) {
                (VerificationStage::FetchEligibility, _) => self.fetch_eligibility(request).await?,
                (stage, Some(candidate)) => self.advance(stage, request, candidate).await?,
                (stage, None) => return Err(ReconcileError::InvalidStage { stage }),
            });
        }

        candidate.ok_or(ReconcileError::InvalidStage {
            stage: VerificationStage::FetchEligibility,
        })
    }

    async fn fetch_eligibility(&self, request: &VerificationRequest) -> Result<Candidate> {
        let candidate = self
            .eligibility
            .get_eligibility(
                &request.details.licence_number,
                request.is_manage_booking,
                request.jurisdiction,
                request.locale,
            )
            .await?;
        Ok(candidate)
    }

    /// Runs one stage against the fetched candidate.
    ///
    /// Returns the candidate to carry into the next stage.
    async fn advance(
        &self,
        stage: VerificationStage,
        request: &VerificationRequest,
        candidate: Candidate,
    ) -> Result<Candidate> {
        match stage {
            VerificationStage::InstructorGate => gate::ensure_instructor_eligible(&candidate)?,
            VerificationStage::MatchIdentity => self.match_identity(request, &candidate)?,
            VerificationStage::EligibilityGate => gate::ensure_citizen_eligible(&candidate)?,
            VerificationStage::ReconcileCrm => {
                return self.reconcile_crm(&candidate, request.candidate_id).await;
            }
            VerificationStage::FetchEligibility | VerificationStage::Done => {}
        }
        Ok(candidate)
    }

    fn match_identity(&self, request: &VerificationRequest, candidate: &Candidate) -> Result<()> {
        does_candidate_match_eligibility(
            &request.details,
            candidate,
            request.journey,
            request.jurisdiction,
        )
        .map_err(|mismatch| {
            for cause in mismatch.causes() {
                metrics::counter!("identity_mismatches_total", "cause" => cause.as_str())
                    .increment(1);
                tracing::warn!(cause = cause.as_str(), "identity mismatch");
            }
            mismatch.into()
        })
    }

    /// Registers or aligns the candidate in the CRM.
    ///
    /// Without a known candidate id the candidate is registered from
    /// scratch; otherwise their existing records are aligned.
    pub async fn reconcile_crm(
        &self,
        candidate: &Candidate,
        candidate_id: Option<CrmId>,
    ) -> Result<Candidate> {
        match candidate_id {
            Some(candidate_id) => align_known_candidate(&self.crm, candidate, candidate_id).await,
            None => register_new_candidate(&self.crm, candidate).await,
        }
    }
}

fn enter(stage: VerificationStage) {
    tracing::info!(%stage, "verification stage");
}
