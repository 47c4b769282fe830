//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::domain::StateCode;
use crate::export::{ValidationError, build_rows, write_csv};
use crate::pairing::{PairingError, PairingOptions};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/pairings", post(generate_pairings))
        .route("/postings/export", post(export_postings))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Merge optional request overrides over the option defaults.
fn pairing_options(min_pairs: Option<usize>, prefer_fill_to_10: Option<bool>) -> PairingOptions {
    let defaults = PairingOptions::default();
    PairingOptions {
        min_pairs: min_pairs.unwrap_or(defaults.min_pairs),
        prefer_fill_to_10: prefer_fill_to_10.unwrap_or(defaults.prefer_fill_to_10),
    }
}

/// Generate alternative pickup/delivery pairs for a lane's endpoints.
async fn generate_pairings(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PairingRequest = serde_json::from_slice(&body).map_err(|e| {
        eprintln!("[JSON parse error] {e}");
        eprintln!("[Body] {}", String::from_utf8_lossy(&body));
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    // Blank geography is rejected before any catalog lookup
    if req.origin_city.trim().is_empty() || req.dest_city.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "Origin and destination city are required".to_string(),
        });
    }

    let origin_state =
        StateCode::parse_normalized(&req.origin_state).map_err(|_| AppError::BadRequest {
            message: format!("Invalid origin state: {}", req.origin_state),
        })?;
    let dest_state =
        StateCode::parse_normalized(&req.dest_state).map_err(|_| AppError::BadRequest {
            message: format!("Invalid destination state: {}", req.dest_state),
        })?;

    let options = pairing_options(req.min_pairs, req.prefer_fill_to_10);
    let result = state
        .engine
        .generate_between(
            &req.origin_city,
            origin_state,
            &req.dest_city,
            dest_state,
            &options,
        )
        .await?;

    Ok(Json(PairingResponse::from_result(&result)).into_response())
}

/// Export a lane's postings as board-ready CSV.
///
/// Runs the full pipeline: pair generation, row expansion with
/// weight validation, then CSV serialization.
async fn export_postings(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: ExportRequest = serde_json::from_slice(&body).map_err(|e| {
        eprintln!("[JSON parse error] {e}");
        eprintln!("[Body] {}", String::from_utf8_lossy(&body));
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    if req.lane.origin_city.trim().is_empty() || req.lane.dest_city.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "Origin and destination city are required".to_string(),
        });
    }

    let options = pairing_options(req.min_pairs, req.prefer_fill_to_10);
    let pairing = state.engine.generate_pairs(&req.lane, &options).await?;
    let rows = build_rows(&req.lane, &pairing, &state.row_options)?;

    let bytes = write_csv(&rows).map_err(|e| AppError::Internal {
        message: format!("CSV error: {e}"),
    })?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"postings.csv\"",
        ),
    ];

    Ok((headers, bytes).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    Internal { message: String },
}

impl From<PairingError> for AppError {
    fn from(e: PairingError) -> Self {
        match e {
            PairingError::UnresolvableLocation { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            PairingError::Catalog(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Unprocessable {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Unprocessable { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        // Log errors to stderr for debugging
        eprintln!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
