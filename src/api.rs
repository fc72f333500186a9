//! HTTP boundary for manual extraction (feature `server`).
//!
//! Two ways in, matching how clients actually hold documents:
//!
//! * `POST /process_pdf` — JSON body `{"file_path": "..."}`; the path or URL
//!   is resolved server-side.
//! * `POST /process_upload` — multipart upload with a `file` field; the
//!   uploaded bytes are processed from a scoped temp file.
//!
//! Success returns the [`InstructionManual`] as JSON. Failures return
//! `{"error": "..."}` with a status mapped from the error taxonomy. Error
//! bodies carry the typed message only — paths and response excerpts for
//! diagnosis, never credentials or backtraces.

use crate::config::ProcessingConfig;
use crate::error::ManualError;
use crate::process::{process, process_bytes};
use axum::{
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Request payload for the path-based endpoint.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    /// Local file path or HTTP/HTTPS URL of the document to process.
    pub file_path: String,
}

/// Standard error response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong.
    pub error: String,
}

/// HTTP status for each member of the error taxonomy.
fn status_for(err: &ManualError) -> StatusCode {
    match err {
        ManualError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ManualError::FileNotFound { .. } => StatusCode::NOT_FOUND,
        ManualError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        ManualError::FetchError { .. } | ManualError::FetchTimeout { .. } => {
            StatusCode::BAD_GATEWAY
        }
        ManualError::ConversionError { .. } | ManualError::DocumentError { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ManualError::ExtractionError { .. }
        | ManualError::ProviderNotConfigured { .. }
        | ManualError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
        ManualError::ExtractionTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ManualError::InvalidConfig(_) | ManualError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Application error wrapper implementing axum's response conversion.
#[derive(Debug)]
pub struct AppError(pub ManualError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        warn!("Request failed ({}): {}", status, self.0);
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ManualError> for AppError {
    fn from(err: ManualError) -> Self {
        AppError(err)
    }
}

/// Build the application router with all routes configured.
pub fn app(config: Arc<ProcessingConfig>) -> Router {
    Router::new()
        .route("/process_pdf", post(process_path))
        .route("/process_upload", post(process_upload))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(config)
}

/// Health check endpoint for monitoring and load balancing.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pdf2manual",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Process a document named by path or URL.
pub async fn process_path(
    State(config): State<Arc<ProcessingConfig>>,
    Json(payload): Json<ProcessRequest>,
) -> Result<Response, AppError> {
    if payload.file_path.trim().is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No file path provided".to_string(),
            }),
        )
            .into_response());
    }

    let manual = process(&payload.file_path, &config).await?;
    Ok((StatusCode::OK, Json(manual)).into_response())
}

/// Process an uploaded document (multipart `file` field).
pub async fn process_upload(
    State(config): State<Arc<ProcessingConfig>>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError(ManualError::Internal(format!(
            "Failed to read multipart field: {e}"
        )))
    })? {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .unwrap_or("upload.pdf")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError(ManualError::Internal(format!(
                    "Failed to read file data: {e}"
                )))
            })?;
            upload = Some((file_name, bytes));
            break;
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError(ManualError::Internal(
            "No file provided in upload".to_string(),
        ))
    })?;

    let manual = process_bytes(&bytes, &file_name, &config).await?;
    Ok((StatusCode::OK, Json(manual)).into_response())
}
