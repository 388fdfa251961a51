use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gev_portal::config::AppConfig;
use gev_portal::error::AppError;
use gev_portal::telemetry;
use gev_portal::workflows::admissions::{AdmissionsService, StatusProgression};
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(config.portal.load_catalog()?);
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let progression =
        StatusProgression::spawn(Arc::new(config.portal.review_policy()), repository.clone());
    let admissions = Arc::new(
        AdmissionsService::new(catalog.clone(), repository).with_progression(progression),
    );

    let app = with_portal_routes(admissions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        institutions = catalog.institutions().len(),
        "admissions service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
