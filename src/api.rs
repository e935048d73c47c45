//! HTTP resource endpoint for the site catalog.
//!
//! Routes:
//!
//! - `GET /sites/` lists all sites.
//! - `POST /sites/` creates a site (201).
//! - `GET /sites/:id` fetches one site.
//! - `PATCH /sites/:id` updates a site (200).
//! - `DELETE /sites/:id` deletes a site (204).
//!
//! Each route is also served without the trailing slash.

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::error::SiteError;
use crate::validation::SitePayload;
use crate::{Site, SiteId, SiteService};

/// Shared handle to the service. The mutex serialises access to the single
/// SQLite connection.
pub type AppState = Arc<Mutex<SiteService>>;

/// Builds the router for the site resource.
pub fn router(service: SiteService) -> Router {
    let state: AppState = Arc::new(Mutex::new(service));

    Router::new()
        .route("/sites", get(list_sites).post(create_site))
        .route("/sites/", get(list_sites).post(create_site))
        .route(
            "/sites/:id",
            get(get_site).patch(update_site).delete(delete_site),
        )
        .route(
            "/sites/:id/",
            get(get_site).patch(update_site).delete(delete_site),
        )
        .with_state(state)
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug)]
pub enum ApiError {
    Site(SiteError),
    NotFound,
    MalformedJson(String),
    UnsupportedMediaType,
    Internal(String),
}

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Site(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
            other => ApiError::MalformedJson(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Site(SiteError::Invalid(errors)) => {
                (StatusCode::BAD_REQUEST, errors.to_body())
            }
            ApiError::Site(SiteError::NotFound(_)) | ApiError::NotFound => {
                (StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
            }
            ApiError::MalformedJson(reason) => (
                StatusCode::BAD_REQUEST,
                json!({"detail": format!("JSON parse error - {reason}")}),
            ),
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                json!({"detail": "Unsupported media type in request; expected application/json."}),
            ),
            ApiError::Site(SiteError::Storage(err)) => {
                error!(error = %err, "storage failure");
                server_error()
            }
            ApiError::Internal(message) => {
                error!(error = %message, "request handler failed");
                server_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

fn server_error() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "A server error occurred."}),
    )
}

/// Runs `op` against the service on the blocking pool.
async fn with_service<T, F>(state: AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SiteService) -> Result<T, SiteError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let service = state.lock().unwrap_or_else(PoisonError::into_inner);
        op(&service)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(ApiError::from)
}

/// Non-numeric IDs cannot name a site, so they are reported as not found.
fn site_id(path: Result<Path<i64>, PathRejection>) -> Result<SiteId, ApiError> {
    path.map(|Path(id)| SiteId::new(id))
        .map_err(|_| ApiError::NotFound)
}

async fn list_sites(State(state): State<AppState>) -> Result<Json<Vec<Site>>, ApiError> {
    let sites = with_service(state, |service| service.list_sites()).await?;
    Ok(Json(sites))
}

async fn get_site(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Site>, ApiError> {
    let id = site_id(path)?;
    let site = with_service(state, move |service| service.get_site(id)).await?;
    Ok(Json(site))
}

async fn create_site(
    State(state): State<AppState>,
    payload: Result<Json<SitePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Site>), ApiError> {
    let Json(payload) = payload?;
    let site = with_service(state, move |service| service.create_site(payload)).await?;
    Ok((StatusCode::CREATED, Json(site)))
}

async fn update_site(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SitePayload>, JsonRejection>,
) -> Result<Json<Site>, ApiError> {
    let id = site_id(path)?;
    let Json(payload) = payload?;
    let site = with_service(state, move |service| service.update_site(id, payload)).await?;
    Ok(Json(site))
}

async fn delete_site(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = site_id(path)?;
    with_service(state, move |service| service.delete_site(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
