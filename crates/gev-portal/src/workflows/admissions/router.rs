use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicationId, ApplicationPayload, SubmissionReceipt};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{AdmissionsService, AdmissionsServiceError};

/// Router builder exposing the catalog, submission, and status endpoints.
pub fn admissions_router<R>(service: Arc<AdmissionsService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/institutions", get(institutions_handler::<R>))
        .route("/api/applications", post(submit_handler::<R>))
        .route("/api/applications/:application_id", get(status_handler::<R>))
        .with_state(service)
}

pub(crate) async fn institutions_handler<R>(
    State(service): State<Arc<AdmissionsService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    (StatusCode::OK, Json(service.institutions())).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AdmissionsService<R>>>,
    Json(payload): Json<ApplicationPayload>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.submit(payload) {
        Ok(record) => {
            let receipt = SubmissionReceipt {
                application_id: record.application_id,
            };
            (StatusCode::CREATED, Json(receipt)).into_response()
        }
        Err(AdmissionsServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "message": "application already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "message": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<AdmissionsService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) if err.is_not_found() => {
            let payload = json!({
                "message": "Application not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "message": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
