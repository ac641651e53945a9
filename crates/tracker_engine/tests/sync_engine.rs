use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tracker_core::{
    DateRange, FallbackDataset, FilterPredicate, JobDraft, JobId, JobPatch, JobRecord, JobStatus,
    Severity, TrackerState, COMPANY_REQUIRED, CREATE_SUCCEEDED, DELETE_FAILED, LOAD_FAILED,
    UPDATE_FAILED, UPDATE_SUCCEEDED,
};
use tracker_engine::{
    ErrorKind, FailureKind, Gateway, GatewayError, GatewaySettings, ReqwestGateway, SyncEngine,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List,
    Create(String),
    Update(String),
    Delete(String),
}

/// Scripted gateway that records every call it receives.
#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    lists: Mutex<VecDeque<Result<Vec<JobRecord>, FailureKind>>>,
    created_id: Mutex<Option<String>>,
    mutation_failure: Mutex<Option<FailureKind>>,
}

impl FakeGateway {
    fn listing(self, response: Result<Vec<JobRecord>, FailureKind>) -> Self {
        self.lists.lock().unwrap().push_back(response);
        self
    }

    fn assigning(self, id: &str) -> Self {
        *self.created_id.lock().unwrap() = Some(id.to_string());
        self
    }

    fn failing_mutations(self, kind: FailureKind) -> Self {
        *self.mutation_failure.lock().unwrap() = Some(kind);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn mutation_result(&self) -> Result<(), GatewayError> {
        match *self.mutation_failure.lock().unwrap() {
            Some(kind) => Err(failure(kind)),
            None => Ok(()),
        }
    }
}

fn failure(kind: FailureKind) -> GatewayError {
    GatewayError {
        kind,
        message: "scripted".to_string(),
    }
}

#[async_trait::async_trait]
impl Gateway for FakeGateway {
    async fn list(&self) -> Result<Vec<JobRecord>, GatewayError> {
        self.calls.lock().unwrap().push(Call::List);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FailureKind::Network))
            .map_err(failure)
    }

    async fn create(&self, draft: &JobDraft) -> Result<JobRecord, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(draft.company.clone()));
        self.mutation_result()?;
        let id = self
            .created_id
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "new".to_string());
        Ok(draft.clone().into_record(JobId::new(id)))
    }

    async fn update(
        &self,
        id: &JobId,
        _patch: &JobPatch,
    ) -> Result<Option<JobRecord>, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.as_str().to_string()));
        self.mutation_result()?;
        Ok(None)
    }

    async fn delete(&self, id: &JobId) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete(id.as_str().to_string()));
        self.mutation_result()
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn job(id: &str, status: JobStatus, date: DateTime<Utc>) -> JobRecord {
    JobDraft::new(format!("Company {id}"), "Engineer", date)
        .with_status(status)
        .into_record(JobId::new(id))
}

fn online_jobs() -> Vec<JobRecord> {
    vec![
        job("1", JobStatus::Applied, day(1)),
        job("2", JobStatus::Interview, day(2)),
    ]
}

async fn loaded_engine(fake: FakeGateway) -> (Arc<FakeGateway>, SyncEngine) {
    let fake = Arc::new(fake);
    let engine = SyncEngine::new(fake.clone());
    engine.load().await;
    (fake, engine)
}

#[tokio::test]
async fn load_against_live_api_is_not_degraded() {
    tracker_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "1",
            "company": "Acme",
            "role": "Eng",
            "status": "Applied",
            "dateApplied": "2024-01-01T00:00:00Z"
        }])))
        .mount(&server)
        .await;
    let gateway = ReqwestGateway::new(&GatewaySettings::with_base_url(format!(
        "{}/api",
        server.uri()
    )))
    .expect("gateway");
    let engine = SyncEngine::new(Arc::new(gateway));

    engine.load().await;

    assert!(!engine.is_degraded());
    assert_eq!(engine.jobs().len(), 1);
    assert_eq!(engine.jobs()[0].company, "Acme");
    assert_eq!(engine.notification(), None);
    assert!(!engine.view().loading);
}

#[tokio::test]
async fn load_against_failing_api_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let gateway = ReqwestGateway::new(&GatewaySettings::with_base_url(format!(
        "{}/api",
        server.uri()
    )))
    .expect("gateway");
    let engine = SyncEngine::new(Arc::new(gateway));

    engine.load().await;

    assert!(engine.is_degraded());
    assert_eq!(engine.jobs(), FallbackDataset::default().records().to_vec());
    let notification = engine.notification().expect("error shown");
    assert_eq!(notification.message, LOAD_FAILED);
    assert_eq!(notification.severity, Severity::Error);
}

#[tokio::test]
async fn retry_discards_local_fallback_edits() {
    let fake = FakeGateway::default()
        .listing(Err(FailureKind::Timeout))
        .listing(Ok(online_jobs()));
    let (fake, engine) = loaded_engine(fake).await;
    assert!(engine.is_degraded());

    let outcome = engine
        .update(&JobId::new("mock1"), JobPatch::status(JobStatus::Offer))
        .await;
    assert!(outcome.applied);

    engine.retry_connection().await;

    assert!(!engine.is_degraded());
    assert_eq!(engine.jobs(), online_jobs());
    assert_eq!(fake.calls(), vec![Call::List, Call::List]);
}

#[tokio::test]
async fn retry_that_fails_again_restores_fallback() {
    let fake = FakeGateway::default()
        .listing(Err(FailureKind::Network))
        .listing(Err(FailureKind::Network));
    let (_fake, engine) = loaded_engine(fake).await;
    engine.delete(&JobId::new("mock2")).await;
    assert_eq!(engine.jobs().len(), 1);

    engine.retry_connection().await;

    assert!(engine.is_degraded());
    assert_eq!(engine.jobs(), FallbackDataset::default().records().to_vec());
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_gateway() {
    let (fake, engine) = loaded_engine(FakeGateway::default().listing(Ok(online_jobs()))).await;

    let outcome = engine.create(JobDraft::new("", "Eng", day(3))).await;

    assert!(!outcome.applied);
    let errors = outcome.validation_errors().expect("validation failure");
    assert_eq!(errors.message_for("company"), Some(COMPANY_REQUIRED));
    assert_eq!(fake.calls(), vec![Call::List]);
    assert_eq!(engine.jobs(), online_jobs());
}

#[tokio::test]
async fn created_record_is_appended_with_server_id() {
    let fake = FakeGateway::default()
        .listing(Ok(online_jobs()))
        .assigning("42");
    let (_fake, engine) = loaded_engine(fake).await;

    let outcome = engine.create(JobDraft::new("Acme", "Eng", day(3))).await;

    assert!(outcome.applied);
    let jobs = engine.jobs();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[2].id, JobId::new("42"));
    assert_eq!(jobs[2].company, "Acme");
    assert_eq!(
        engine.notification().map(|n| n.message),
        Some(CREATE_SUCCEEDED.to_string())
    );
}

#[tokio::test]
async fn create_while_degraded_still_calls_the_gateway() {
    let fake = FakeGateway::default()
        .listing(Err(FailureKind::Network))
        .failing_mutations(FailureKind::Network);
    let (fake, engine) = loaded_engine(fake).await;

    let outcome = engine.create(JobDraft::new("Acme", "Eng", day(3))).await;

    assert_eq!(
        outcome.reason,
        Some(ErrorKind::Transport(FailureKind::Network))
    );
    assert_eq!(
        fake.calls(),
        vec![Call::List, Call::Create("Acme".to_string())]
    );
    assert_eq!(engine.jobs(), FallbackDataset::default().records().to_vec());
}

#[tokio::test]
async fn duplicate_server_id_is_refused() {
    let fake = FakeGateway::default()
        .listing(Ok(online_jobs()))
        .assigning("1");
    let (_fake, engine) = loaded_engine(fake).await;

    let outcome = engine.create(JobDraft::new("Acme", "Eng", day(3))).await;

    assert_eq!(outcome.reason, Some(ErrorKind::DuplicateId(JobId::new("1"))));
    assert_eq!(engine.jobs(), online_jobs());
}

#[tokio::test]
async fn degraded_update_is_local_only() {
    let (fake, engine) =
        loaded_engine(FakeGateway::default().listing(Err(FailureKind::Network))).await;

    let outcome = engine
        .update(&JobId::new("mock1"), JobPatch::status(JobStatus::Offer))
        .await;

    assert!(outcome.applied);
    assert_eq!(fake.calls(), vec![Call::List]);
    let jobs = engine.jobs();
    assert_eq!(jobs[0].status, JobStatus::Offer);
    assert_eq!(jobs[1], FallbackDataset::default().records()[1]);
    assert_eq!(
        engine.notification().map(|n| n.message),
        Some(UPDATE_SUCCEEDED.to_string())
    );
}

#[tokio::test]
async fn degraded_mutation_of_unknown_id_is_not_found() {
    let (fake, engine) =
        loaded_engine(FakeGateway::default().listing(Err(FailureKind::Network))).await;

    let update = engine
        .update(&JobId::new("nope"), JobPatch::status(JobStatus::Offer))
        .await;
    let delete = engine.delete(&JobId::new("nope")).await;

    assert_eq!(update.reason, Some(ErrorKind::NotFound(JobId::new("nope"))));
    assert_eq!(delete.reason, Some(ErrorKind::NotFound(JobId::new("nope"))));
    assert_eq!(fake.calls(), vec![Call::List]);
    assert_eq!(engine.jobs(), FallbackDataset::default().records().to_vec());
    assert_eq!(
        engine.notification().map(|n| n.message),
        Some(DELETE_FAILED.to_string())
    );
}

#[tokio::test]
async fn online_update_failure_leaves_collection_unchanged() {
    let fake = FakeGateway::default()
        .listing(Ok(online_jobs()))
        .failing_mutations(FailureKind::HttpStatus(500));
    let (fake, engine) = loaded_engine(fake).await;

    let outcome = engine
        .update(&JobId::new("1"), JobPatch::status(JobStatus::Offer))
        .await;

    assert_eq!(
        outcome.reason,
        Some(ErrorKind::Transport(FailureKind::HttpStatus(500)))
    );
    assert_eq!(engine.jobs(), online_jobs());
    assert!(!engine.is_degraded());
    assert_eq!(fake.calls(), vec![Call::List, Call::Update("1".to_string())]);
    let notification = engine.notification().expect("error shown");
    assert_eq!(notification.message, UPDATE_FAILED);
    assert_eq!(notification.severity, Severity::Error);
}

#[tokio::test]
async fn online_delete_failure_leaves_collection_unchanged() {
    let fake = FakeGateway::default()
        .listing(Ok(online_jobs()))
        .failing_mutations(FailureKind::Timeout);
    let (_fake, engine) = loaded_engine(fake).await;

    let outcome = engine.delete(&JobId::new("2")).await;

    assert_eq!(outcome.reason, Some(ErrorKind::Transport(FailureKind::Timeout)));
    assert_eq!(engine.jobs(), online_jobs());
}

#[tokio::test]
async fn online_mutations_apply_after_confirmation() {
    let (fake, engine) = loaded_engine(FakeGateway::default().listing(Ok(online_jobs()))).await;

    let updated = engine
        .update(&JobId::new("1"), JobPatch::status(JobStatus::Rejected))
        .await;
    let deleted = engine.delete(&JobId::new("2")).await;

    assert!(updated.applied);
    assert!(deleted.applied);
    assert_eq!(
        engine.jobs(),
        vec![job("1", JobStatus::Rejected, day(1))]
    );
    assert_eq!(
        fake.calls(),
        vec![
            Call::List,
            Call::Update("1".to_string()),
            Call::Delete("2".to_string())
        ]
    );
}

#[tokio::test]
async fn invalid_patch_is_rejected_before_dispatch() {
    let (fake, engine) = loaded_engine(FakeGateway::default().listing(Ok(online_jobs()))).await;
    let patch = JobPatch {
        company: Some("   ".to_string()),
        ..JobPatch::default()
    };

    let outcome = engine.update(&JobId::new("1"), patch).await;

    assert!(outcome.validation_errors().is_some());
    assert_eq!(fake.calls(), vec![Call::List]);
}

#[tokio::test]
async fn filter_by_status_narrows_the_view_only() {
    let (_fake, engine) =
        loaded_engine(FakeGateway::default().listing(Err(FailureKind::Network))).await;

    engine.apply_filter(FilterPredicate::new(
        [JobStatus::Interview],
        DateRange::unbounded(),
    ));

    let visible = engine.filtered_jobs();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, JobId::new("mock2"));
    assert_eq!(engine.jobs().len(), 2);
    assert_eq!(engine.view().jobs.len(), 1);

    engine.reset_filter();
    assert_eq!(engine.filtered_jobs().len(), 2);
}

#[tokio::test]
async fn dismissed_notification_clears_view() {
    let (_fake, engine) =
        loaded_engine(FakeGateway::default().listing(Err(FailureKind::Network))).await;
    assert!(engine.view().notification.is_some());
    engine.consume_dirty();

    engine.dismiss_notification();

    assert!(engine.consume_dirty());
    assert_eq!(engine.notification(), None);
    assert_eq!(engine.view().notification, None);
}

#[tokio::test]
async fn seeded_state_uses_custom_fallback() {
    let fallback = FallbackDataset::from_records(vec![job("only", JobStatus::Offer, day(9))]);
    let fake = Arc::new(FakeGateway::default().listing(Err(FailureKind::Decode)));
    let engine = SyncEngine::with_state(fake, TrackerState::new().with_fallback(fallback.clone()));

    engine.load().await;

    assert_eq!(engine.jobs(), fallback.to_jobs());
}
