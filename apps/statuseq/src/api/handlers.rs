//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{CompareRequest, CompareResponse, HealthResponse},
};
use crate::loader;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use statuseq_core::StatusEqError;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// COMPARE HANDLER
// =============================================================================

/// Compare the statuses of two resource documents.
pub async fn compare_handler(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> impl IntoResponse {
    let CompareRequest { old, new, typed } = request;

    let result = loader::to_resource(old, typed).and_then(|old_resource| {
        let new_resource = loader::to_resource(new, typed)?;
        state.comparator.compare(&old_resource, &new_resource)
    });

    match result {
        Ok(comparison) => {
            tracing::debug!(equal = comparison.equal, typed, "Compared statuses");
            (StatusCode::OK, Json(CompareResponse::verdict(comparison)))
        }
        Err(e) if is_client_error(&e) => (
            StatusCode::BAD_REQUEST,
            Json(CompareResponse::error(format!("Invalid resource: {}", e))),
        ),
        Err(e) => {
            tracing::error!("Comparison failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CompareResponse::error(format!("Comparison failed: {}", e))),
            )
        }
    }
}

/// Errors caused by the submitted documents rather than the server.
fn is_client_error(error: &StatusEqError) -> bool {
    matches!(
        error,
        StatusEqError::UnsupportedResourceKind(_) | StatusEqError::SerializationError(_)
    )
}

// =============================================================================
// CONFIG HANDLER
// =============================================================================

/// Effective comparison options.
pub async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.comparator.options().clone()))
}
