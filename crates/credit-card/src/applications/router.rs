use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::card_request::{CardRequestGateway, CardRequestService};
use super::domain::{ApplicationPayload, CreditCardApplication};
use super::repository::ApplicationRepository;
use super::response::ApiError;
use super::service::CreditCardApplicationService;

/// Shared handles for the application routes.
pub struct ApplicationState<R, G> {
    pub applications: Arc<CreditCardApplicationService<R>>,
    pub card_requests: Arc<CardRequestService<R, G>>,
}

impl<R, G> ApplicationState<R, G>
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>) -> Self {
        let applications = Arc::new(CreditCardApplicationService::new(repository));
        let card_requests = Arc::new(CardRequestService::new(applications.clone(), gateway));
        Self {
            applications,
            card_requests,
        }
    }
}

impl<R, G> Clone for ApplicationState<R, G> {
    fn clone(&self) -> Self {
        Self {
            applications: self.applications.clone(),
            card_requests: self.card_requests.clone(),
        }
    }
}

/// Router builder exposing the credit card application endpoints.
pub fn application_router<R, G>(state: ApplicationState<R, G>) -> Router
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    Router::new()
        .route(
            "/credit/card/applications",
            get(list_handler::<R, G>).post(add_handler::<R, G>),
        )
        .route(
            "/credit/card/applications/:id",
            get(get_handler::<R, G>)
                .put(update_handler::<R, G>)
                .delete(delete_handler::<R, G>),
        )
        .route(
            "/credit/card/applications/send-card-request/:id",
            post(send_card_request_handler::<R, G>),
        )
        .with_state(state)
}

pub(crate) async fn list_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    uri: Uri,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    info!("fetching all credit card applications");
    match state.applications.list().await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

pub(crate) async fn get_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    info!(personal_id = %id, "fetching credit card application");
    match state.applications.get_by_personal_id(&id).await {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

pub(crate) async fn add_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    uri: Uri,
    payload: Result<Json<ApplicationPayload>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    let application = match parse_payload(payload, &uri) {
        Ok(application) => application,
        Err(err) => return err.into_response(),
    };

    info!(personal_id = %application.applicant_id, "adding credit card application");
    match state.applications.add(application).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

pub(crate) async fn update_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    Path(id): Path<String>,
    uri: Uri,
    payload: Result<Json<ApplicationPayload>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    let application = match parse_payload(payload, &uri) {
        Ok(application) => application,
        Err(err) => return err.into_response(),
    };

    info!(personal_id = %id, "updating credit card application");
    match state.applications.update_by_personal_id(&id, application).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

pub(crate) async fn delete_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    info!(personal_id = %id, "deleting credit card application");
    match state.applications.delete_by_personal_id(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

/// Relays the partner's status and body; only load failures use the error envelope.
pub(crate) async fn send_card_request_handler<R, G>(
    State(state): State<ApplicationState<R, G>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response
where
    R: ApplicationRepository + 'static,
    G: CardRequestGateway + 'static,
{
    info!(personal_id = %id, "sending card request for credit card application");
    match state.card_requests.send_for_personal_id(&id).await {
        Ok(outcome) => {
            let status =
                StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, outcome.body).into_response()
        }
        Err(err) => ApiError::from_service(err, uri.path()).into_response(),
    }
}

fn parse_payload(
    payload: Result<Json<ApplicationPayload>, JsonRejection>,
    uri: &Uri,
) -> Result<CreditCardApplication, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::rejection(rejection, uri.path()))?;
    payload
        .into_application()
        .map_err(|errors| ApiError::validation(errors, uri.path()))
}
