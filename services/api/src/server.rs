use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_card::applications::{ApplicationState, HttpCardRequestClient, SqlApplicationRepository};
use credit_card::config::AppConfig;
use credit_card::error::AppError;
use credit_card::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(SqlApplicationRepository::connect(&config.database).await?);
    let gateway = Arc::new(HttpCardRequestClient::new(
        config.card_request.endpoint.clone(),
    )?);
    let state = ApplicationState::new(repository, gateway);

    let app = with_application_routes(state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        card_request_endpoint = %config.card_request.endpoint,
        "credit card application service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) async fn migrate() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    SqlApplicationRepository::connect(&config.database).await?;
    info!(database = %config.database.url, "application table is in place");
    Ok(())
}
