//! Integration tests for identity reconciliation over in-memory adapters.

use std::fmt;
use std::sync::{Arc, Mutex};

use common::{Agency, CrmId, Journey, Jurisdiction};
use crm::{CrmCandidateFields, CrmCandidateRecord, CrmOperation, CrmStoreError, InMemoryCrmStore};
use domain::{CalendarDate, CandidateDetails, LicenceNumber, ReferenceNumber, TestType};
use eligibility::{
    EligibilityAdapter, EligibilityError, EligibilityResponse, InMemoryEligibilityTransport,
    RemoteAddress, RemoteEligibility, TransportError,
};
use reconciler::{
    IdentityReconciler, MismatchCause, ReconcileError, VerificationRequest, VerificationStage,
};
use tracing::field::{Field, Visit};
use tracing::instrument::WithSubscriber;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

const GB_LICENCE: &str = "JONES061102W97YT";
const NI_LICENCE: &str = "12345678";

type TestReconciler =
    IdentityReconciler<EligibilityAdapter<InMemoryEligibilityTransport>, InMemoryCrmStore>;

struct TestHarness {
    reconciler: TestReconciler,
    transport: InMemoryEligibilityTransport,
    crm: InMemoryCrmStore,
}

impl TestHarness {
    fn new() -> Self {
        let transport = InMemoryEligibilityTransport::new();
        let crm = InMemoryCrmStore::new();
        let reconciler =
            IdentityReconciler::new(EligibilityAdapter::new(transport.clone()), crm.clone());

        Self {
            reconciler,
            transport,
            crm,
        }
    }

    async fn register(&self, licence: &str, response: EligibilityResponse) {
        self.transport.insert(licence, response).await;
    }
}

#[derive(Debug)]
struct CapturedEvent {
    level: Level,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Records every event emitted while a future runs.
#[derive(Clone, Default)]
struct EventRecorder(Arc<Mutex<Vec<CapturedEvent>>>);

impl EventRecorder {
    fn with_message(&self, level: Level, message: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .drain(..)
            .filter(|event| event.level == level && event.field("message") == Some(message))
            .collect()
    }
}

struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
}

impl<S: Subscriber> Layer<S> for EventRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        event.record(&mut FieldVisitor(&mut fields));
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields,
        });
    }
}

fn address() -> RemoteAddress {
    RemoteAddress {
        line1: Some("1 High Street".to_string()),
        line5: Some("Leeds".to_string()),
        postcode: Some("LS1 1AA".to_string()),
        ..RemoteAddress::default()
    }
}

fn response(eligibilities: Vec<RemoteEligibility>) -> EligibilityResponse {
    EligibilityResponse {
        first_names: "Wendy".to_string(),
        surname: "Jones".to_string(),
        date_of_birth: "1962-11-10T00:00:00Z".to_string(),
        title: Some("Mrs".to_string()),
        gender: Some("F".to_string()),
        address: Some(address()),
        eligibilities,
        eligible_to_book_online: true,
    }
}

fn car() -> Vec<RemoteEligibility> {
    vec![RemoteEligibility::new("Car", true)]
}

fn instructor_tests(personal_reference: &str, payment_receipt: &str) -> Vec<RemoteEligibility> {
    let mut adi = RemoteEligibility::new("ADI-P1", true);
    adi.personal_reference_number = Some(personal_reference.to_string());
    let mut dva = RemoteEligibility::new("ADI-P1-DVA", true);
    dva.payment_receipt_number = Some(payment_receipt.to_string());
    vec![adi, dva]
}

fn details(licence: &str, jurisdiction: Jurisdiction) -> CandidateDetails {
    CandidateDetails::new(
        LicenceNumber::parse(licence, jurisdiction).unwrap(),
        "Wendy",
        "Jones",
        CalendarDate::from_ymd(1962, 11, 10).unwrap(),
    )
}

fn gb_citizen() -> VerificationRequest {
    VerificationRequest::citizen(
        details(GB_LICENCE, Jurisdiction::GreatBritain),
        Jurisdiction::GreatBritain,
    )
}

#[tokio::test]
async fn test_new_candidate_is_registered() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let candidate = h.reconciler.verify(&gb_citizen()).await.unwrap();

    assert!(candidate.candidate_id.is_some());
    assert!(candidate.licence_id.is_some());
    assert_eq!(candidate.bookable_test_types(), vec![TestType::Car]);
    assert_eq!(
        h.crm.writes().await,
        vec![CrmOperation::CreateCandidate, CrmOperation::CreateLicence]
    );

    let record = h.crm.candidate(candidate.candidate_id.unwrap()).await.unwrap();
    assert_eq!(record.fields.title.as_deref(), Some("mrs"));
    assert_eq!(record.fields.birthdate.as_deref(), Some("1962-11-10"));
}

#[tokio::test]
async fn test_redacted_firstnames_match_blank_submission() {
    let h = TestHarness::new();
    let mut redacted = response(car());
    redacted.first_names = "---".to_string();
    h.register(GB_LICENCE, redacted).await;

    let mut request = gb_citizen();
    request.details.firstnames = String::new();

    assert!(h.reconciler.verify(&request).await.is_ok());
}

#[tokio::test]
async fn test_mismatch_reports_every_field_and_skips_crm() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let mut request = gb_citizen();
    request.details.surname = "Smith".to_string();
    request.details.date_of_birth = CalendarDate::from_ymd(1963, 11, 10).unwrap();

    let err = h.reconciler.verify(&request).await.unwrap_err();
    let ReconcileError::IdentityMismatch(mismatch) = &err else {
        panic!("expected identity mismatch, got {err:?}");
    };
    assert_eq!(
        mismatch.causes(),
        &[MismatchCause::Surname, MismatchCause::DateOfBirth]
    );
    assert_eq!(
        err.to_string(),
        "Candidate details do not match the licence record"
    );
    assert!(err.is_recoverable());
    assert!(h.crm.calls().await.is_empty());
}

#[tokio::test]
async fn test_instructor_gate_runs_before_matching() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let mut details = details(GB_LICENCE, Jurisdiction::GreatBritain);
    details.surname = "Smith".to_string();
    let request = VerificationRequest::instructor(details, Jurisdiction::GreatBritain);

    assert_eq!(
        h.reconciler.verify(&request).await.unwrap_err(),
        ReconcileError::NotEligible
    );
}

#[tokio::test]
async fn test_citizen_gate_runs_after_matching() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(vec![RemoteEligibility::new("Car", false)]))
        .await;

    let mut request = gb_citizen();
    request.details.surname = "Smith".to_string();
    assert!(matches!(
        h.reconciler.verify(&request).await,
        Err(ReconcileError::IdentityMismatch(_))
    ));

    assert_eq!(
        h.reconciler.verify(&gb_citizen()).await.unwrap_err(),
        ReconcileError::NotEligible
    );
    assert!(h.crm.calls().await.is_empty());
}

#[tokio::test]
async fn test_gb_instructor_matches_personal_reference() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(instructor_tests("123456", "1234567890123456")))
        .await;

    let details = details(GB_LICENCE, Jurisdiction::GreatBritain).with_reference(
        ReferenceNumber::parse(Some("123456"), Jurisdiction::GreatBritain).unwrap(),
    );
    let request = VerificationRequest::instructor(details, Jurisdiction::GreatBritain);

    assert!(h.reconciler.verify(&request).await.is_ok());
}

#[tokio::test]
async fn test_ni_instructor_matches_payment_receipt() {
    let h = TestHarness::new();
    h.register(NI_LICENCE, response(instructor_tests("123456", "1234567890123456")))
        .await;

    let receipt = details(NI_LICENCE, Jurisdiction::NorthernIreland).with_reference(
        ReferenceNumber::parse(Some("1234567890123456"), Jurisdiction::NorthernIreland).unwrap(),
    );
    let request = VerificationRequest::instructor(receipt, Jurisdiction::NorthernIreland);
    assert!(h.reconciler.verify(&request).await.is_ok());

    let personal = details(NI_LICENCE, Jurisdiction::NorthernIreland).with_reference(
        ReferenceNumber::parse(Some("123456"), Jurisdiction::NorthernIreland).unwrap(),
    );
    let request = VerificationRequest::instructor(personal, Jurisdiction::NorthernIreland);
    let err = h.reconciler.verify(&request).await.unwrap_err();
    let ReconcileError::IdentityMismatch(mismatch) = err else {
        panic!("expected identity mismatch");
    };
    assert_eq!(mismatch.causes(), &[MismatchCause::ReferenceNumber]);
}

#[tokio::test]
async fn test_new_candidate_without_address_fails() {
    let h = TestHarness::new();
    let mut body = response(car());
    body.address = None;
    h.register(GB_LICENCE, body).await;

    let err = h.reconciler.verify(&gb_citizen()).await.unwrap_err();
    assert_eq!(err, ReconcileError::MissingAddress);
    assert!(!err.is_recoverable());
    assert!(h.crm.writes().await.is_empty());
}

#[tokio::test]
async fn test_second_verification_writes_nothing() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let first = h.reconciler.verify(&gb_citizen()).await.unwrap();
    let candidate_id = first.candidate_id.unwrap();
    h.crm.clear_calls().await;

    let second = h
        .reconciler
        .verify(&gb_citizen().with_candidate_id(candidate_id))
        .await
        .unwrap();

    assert_eq!(h.crm.calls().await, vec![CrmOperation::GetLicenceAndCandidate]);
    assert_eq!(second.candidate_id, Some(candidate_id));
    assert_eq!(second.licence_id, first.licence_id);
    assert_eq!(second.person_reference.as_deref(), Some("C-000001"));
}

#[tokio::test]
async fn test_address_change_updates_licence_then_candidate() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;
    let first = h.reconciler.verify(&gb_citizen()).await.unwrap();
    h.crm.clear_calls().await;

    let mut moved = response(car());
    moved.address = Some(RemoteAddress {
        postcode: Some("LS2 2BB".to_string()),
        ..address()
    });
    h.register(GB_LICENCE, moved).await;

    h.reconciler
        .verify(&gb_citizen().with_candidate_id(first.candidate_id.unwrap()))
        .await
        .unwrap();

    assert_eq!(
        h.crm.writes().await,
        vec![CrmOperation::UpdateLicence, CrmOperation::UpdateCandidate]
    );
    let licence = h.crm.licence(first.licence_id.unwrap()).await.unwrap();
    assert_eq!(licence.address.postcode.as_deref(), Some("LS2 2BB"));
}

#[tokio::test]
async fn test_core_change_updates_candidate_only() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;
    let first = h.reconciler.verify(&gb_citizen()).await.unwrap();
    h.crm.clear_calls().await;

    let mut retitled = response(car());
    retitled.title = Some("Dr".to_string());
    h.register(GB_LICENCE, retitled).await;

    let candidate_id = first.candidate_id.unwrap();
    h.reconciler
        .verify(&gb_citizen().with_candidate_id(candidate_id))
        .await
        .unwrap();

    assert_eq!(h.crm.writes().await, vec![CrmOperation::UpdateCandidate]);
    let record = h.crm.candidate(candidate_id).await.unwrap();
    assert_eq!(record.fields.title.as_deref(), Some("dr"));
}

#[tokio::test]
async fn test_known_candidate_without_licence_gets_one() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let candidate_id = CrmId::new();
    h.crm
        .seed_candidate(CrmCandidateRecord {
            candidate_id,
            person_reference: Some("C-000777".to_string()),
            fields: CrmCandidateFields::default(),
        })
        .await;

    let candidate = h
        .reconciler
        .verify(&gb_citizen().with_candidate_id(candidate_id))
        .await
        .unwrap();

    assert_eq!(
        h.crm.writes().await,
        vec![CrmOperation::CreateLicence, CrmOperation::UpdateCandidate]
    );
    assert_eq!(h.crm.licence_count().await, 1);
    assert!(candidate.licence_id.is_some());
    assert_eq!(candidate.person_reference.as_deref(), Some("C-000777"));
}

#[tokio::test]
async fn test_crm_failures_are_classified() {
    let cases = [
        (
            CrmOperation::CreateCandidate,
            429,
            ReconcileError::TooManyRequests,
        ),
        (
            CrmOperation::CreateCandidate,
            503,
            ReconcileError::ServerError(503),
        ),
        (
            CrmOperation::CreateLicence,
            400,
            ReconcileError::CrmFailure {
                operation: CrmOperation::CreateLicence,
            },
        ),
    ];

    for (operation, status, expected) in cases {
        let h = TestHarness::new();
        h.register(GB_LICENCE, response(car())).await;
        h.crm
            .fail_on(operation, CrmStoreError::with_status(status))
            .await;

        let err = h.reconciler.verify(&gb_citizen()).await.unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(err.is_retryable(), status != 400);
    }
}

#[tokio::test]
async fn test_eligibility_auth_error_is_not_recoverable() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;
    h.transport
        .set_failure(Some(TransportError::with_status(401)))
        .await;

    let err = h.reconciler.verify(&gb_citizen()).await.unwrap_err();
    assert_eq!(
        err,
        ReconcileError::Eligibility(EligibilityError::AuthError(401))
    );
    assert!(!err.is_recoverable());
    assert!(!err.is_retryable());
    assert!(h.crm.calls().await.is_empty());
}

#[tokio::test]
async fn test_unknown_licence_is_recoverable() {
    let h = TestHarness::new();

    let err = h.reconciler.verify(&gb_citizen()).await.unwrap_err();
    assert_eq!(
        err,
        ReconcileError::Eligibility(EligibilityError::LicenceNotFound)
    );
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_unknown_test_type_is_dropped() {
    let h = TestHarness::new();
    h.register(
        GB_LICENCE,
        response(vec![
            RemoteEligibility::new("Car", true),
            RemoteEligibility::new("Hovercraft", true),
        ]),
    )
    .await;

    let candidate = h.reconciler.verify(&gb_citizen()).await.unwrap();
    assert_eq!(candidate.eligibilities.len(), 1);
    assert_eq!(candidate.bookable_test_types(), vec![TestType::Car]);
}

#[tokio::test]
async fn test_agency_mismatch_stops_managed_booking() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let request = gb_citizen().managing_booking(Some(Agency::Dva));
    let err = h.reconciler.verify(&request).await.unwrap_err();

    assert_eq!(
        err,
        ReconcileError::AgencyMismatch {
            recorded: Agency::Dva,
            selected: Agency::Dvsa,
        }
    );
    assert!(!err.is_recoverable());
    assert!(h.transport.requests().await.is_empty());
}

#[tokio::test]
async fn test_managed_booking_flag_reaches_eligibility_service() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    h.reconciler
        .verify(&gb_citizen().managing_booking(Some(Agency::Dvsa)))
        .await
        .unwrap();

    let requests = h.transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_manage_booking);
}

#[tokio::test]
async fn test_each_mismatch_cause_is_logged_as_warning() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let mut request = gb_citizen();
    request.details.surname = "Smith".to_string();
    request.details.date_of_birth = CalendarDate::from_ymd(1963, 11, 10).unwrap();

    let recorder = EventRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let result = h.reconciler.verify(&request).with_subscriber(subscriber).await;
    assert!(matches!(result, Err(ReconcileError::IdentityMismatch(_))));

    let causes: Vec<String> = recorder
        .with_message(Level::WARN, "identity mismatch")
        .iter()
        .filter_map(|event| event.field("cause").map(str::to_string))
        .collect();
    assert_eq!(causes, vec!["surname", "date_of_birth"]);
}

#[tokio::test]
async fn test_stages_are_logged_in_journey_order() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(instructor_tests("123456", "1234567890123456")))
        .await;

    let details = details(GB_LICENCE, Jurisdiction::GreatBritain).with_reference(
        ReferenceNumber::parse(Some("123456"), Jurisdiction::GreatBritain).unwrap(),
    );
    let request = VerificationRequest::instructor(details, Jurisdiction::GreatBritain);

    let recorder = EventRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    h.reconciler
        .verify(&request)
        .with_subscriber(subscriber)
        .await
        .unwrap();

    let stages: Vec<String> = recorder
        .with_message(Level::INFO, "verification stage")
        .iter()
        .filter_map(|event| event.field("stage").map(str::to_string))
        .collect();
    let expected: Vec<String> = VerificationStage::sequence(Journey::Instructor)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(stages, expected);
}

#[tokio::test]
async fn test_failed_stage_ends_the_sequence() {
    let h = TestHarness::new();
    h.register(GB_LICENCE, response(car())).await;

    let mut request = gb_citizen();
    request.details.surname = "Smith".to_string();

    let recorder = EventRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let _ = h.reconciler.verify(&request).with_subscriber(subscriber).await;

    let stages: Vec<String> = recorder
        .with_message(Level::INFO, "verification stage")
        .iter()
        .filter_map(|event| event.field("stage").map(str::to_string))
        .collect();
    assert_eq!(stages, vec!["FetchEligibility", "MatchIdentity"]);
    assert!(h.crm.calls().await.is_empty());
}
