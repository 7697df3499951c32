use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::applications::card_request::{CardRequest, CardRequestGateway, CardRequestResponse};
use crate::applications::domain::{CreditCardApplication, Status};
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::router::ApplicationState;
use crate::applications::service::CreditCardApplicationService;

pub(super) const PERSONAL_ID: &str = "12345678901";

pub(super) fn john_doe() -> CreditCardApplication {
    CreditCardApplication::new("John", "Doe", PERSONAL_ID, Status::Approved)
}

pub(super) fn jane_roe() -> CreditCardApplication {
    CreditCardApplication::new("Jane", "Roe", "10987654321", Status::Pending)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<CreditCardApplication>>>,
    sequence: Arc<AtomicI64>,
    withhold_keys: bool,
}

impl MemoryRepository {
    /// Stores rows but reports no generated key, like a driver that drops it.
    pub(super) fn without_generated_keys() -> Self {
        Self {
            withhold_keys: true,
            ..Self::default()
        }
    }

    pub(super) fn records(&self) -> Vec<CreditCardApplication> {
        self.records.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<CreditCardApplication>, RepositoryError> {
        Ok(self.records())
    }

    async fn fetch_by_applicant_id(
        &self,
        applicant_id: &str,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .iter()
            .find(|record| record.applicant_id == applicant_id)
            .cloned())
    }

    async fn insert(
        &self,
        application: &CreditCardApplication,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard
            .iter()
            .any(|record| record.applicant_id == application.applicant_id)
        {
            return Err(RepositoryError::Conflict);
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = application.clone().with_id(id);
        guard.push(stored.clone());

        if self.withhold_keys {
            Ok(None)
        } else {
            Ok(Some(stored))
        }
    }

    async fn update_by_applicant_id(
        &self,
        application: &CreditCardApplication,
    ) -> Result<u64, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        let mut updated = 0;
        for record in guard
            .iter_mut()
            .filter(|record| record.applicant_id == application.applicant_id)
        {
            record.applicant_name = application.applicant_name.clone();
            record.applicant_surname = application.applicant_surname.clone();
            record.status = application.status;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_by_applicant_id(&self, applicant_id: &str) -> Result<u64, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        let before = guard.len();
        guard.retain(|record| record.applicant_id != applicant_id);
        Ok((before - guard.len()) as u64)
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ApplicationRepository for UnavailableRepository {
    async fn list(&self) -> Result<Vec<CreditCardApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn fetch_by_applicant_id(
        &self,
        _applicant_id: &str,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn insert(
        &self,
        _application: &CreditCardApplication,
    ) -> Result<Option<CreditCardApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn update_by_applicant_id(
        &self,
        _application: &CreditCardApplication,
    ) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    async fn delete_by_applicant_id(&self, _applicant_id: &str) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

/// Gateway double that records requests and answers with a fixed response.
pub(super) struct RecordingGateway {
    requests: Mutex<Vec<CardRequest>>,
    reply: CardRequestResponse,
}

impl RecordingGateway {
    pub(super) fn replying(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: CardRequestResponse {
                status,
                body: body.to_string(),
            },
        }
    }

    pub(super) fn requests(&self) -> Vec<CardRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::replying(200, "accepted")
    }
}

#[async_trait]
impl CardRequestGateway for RecordingGateway {
    async fn send(&self, request: &CardRequest) -> CardRequestResponse {
        self.requests.lock().expect("lock").push(request.clone());
        self.reply.clone()
    }
}

pub(super) fn build_service() -> (
    CreditCardApplicationService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CreditCardApplicationService::new(repository.clone());
    (service, repository)
}

pub(super) fn build_state(
    gateway: RecordingGateway,
) -> (
    ApplicationState<MemoryRepository, RecordingGateway>,
    Arc<MemoryRepository>,
    Arc<RecordingGateway>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let gateway = Arc::new(gateway);
    let state = ApplicationState::new(repository.clone(), gateway.clone());
    (state, repository, gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

/// Asserts the error envelope shape and returns its message.
pub(super) async fn assert_error_envelope(
    response: Response,
    status: StatusCode,
    path: &str,
) -> String {
    assert_eq!(response.status(), status);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("status").and_then(Value::as_u64),
        Some(u64::from(status.as_u16()))
    );
    assert_eq!(
        payload.get("error").and_then(Value::as_str),
        status.canonical_reason()
    );
    assert_eq!(payload.get("path").and_then(Value::as_str), Some(path));
    assert!(payload.get("timestamp").is_some());
    payload
        .get("message")
        .and_then(Value::as_str)
        .expect("message present")
        .to_string()
}
