//! HTTP API for report generation
//!
//! Routes:
//! - `POST /api/report` with `{"data": "<rows>"}` answers `{"report": "..."}`
//! - `GET /health` answers `{"status": "ok"}`
//!
//! Errors are always `{"error": "..."}`. Upstream failures are logged and
//! collapsed into one generic message.

use crate::error::{ReportError, Result};
use crate::report::ReportGenerator;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Message returned for any failure past request validation
pub const GENERIC_ERROR: &str = "An unexpected error occurred while generating the report.";

/// Shared handler state
pub type SharedGenerator = Arc<dyn ReportGenerator>;

/// Successful report payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
}

/// Error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of an API request
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    NotFound,
    Report(ReportError),
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Report(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Report(err) if err.is_client_error() => {
                warn!("Rejected report request: {}", err);
                (StatusCode::BAD_REQUEST, "Invalid request body")
            }
            ApiError::Report(err) => {
                error!("Report generation failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Extract the `data` string from a raw JSON body
///
/// Unparseable JSON is a [`ReportError::MalformedBody`]; a missing, empty,
/// or non-string `data` field is a [`ReportError::InvalidBody`].
pub fn parse_report_data(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body)?;
    match value.get("data") {
        Some(Value::String(data)) if !data.is_empty() => Ok(data.clone()),
        _ => Err(ReportError::InvalidBody),
    }
}

async fn create_report(
    State(generator): State<SharedGenerator>,
    body: Bytes,
) -> std::result::Result<Json<ReportResponse>, ApiError> {
    let data = parse_report_data(&body)?;
    let report = generator.generate_report(&data).await?;
    Ok(Json(ReportResponse { report }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the application router around a shared report generator
pub fn router(generator: SharedGenerator) -> Router {
    Router::new()
        .route(
            "/api/report",
            post(create_report).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(generator)
}

/// Serve the API on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, generator: SharedGenerator) -> Result<()> {
    info!("Report server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(generator))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Report server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
