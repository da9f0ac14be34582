//! HTTP request handlers for the link builder API
//!
//! This module exposes the form's backing operations:
//! - Generating a tracked link and remembering it as the last link
//! - Restoring or clearing the last link
//! - Reading, counting and clearing the error log

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::composer::ComposeError;
use crate::database::AppState;
use crate::model::{ErrorListResponse, GenerateResponse, LinkRequest};

/// Generates a tracked link
///
/// This handler:
/// 1. Validates the form (non-blank link, complete key/value pairs)
/// 2. Composes the final URL
/// 3. Stores it as the last link, or logs the failure
///
/// # Request Body
///
/// ```json
/// {
///   "link": "example.com",
///   "params": [{ "key": "utm_source", "value": "google" }]
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - Link generated (`saved` tells whether it was stored)
/// - **400 Bad Request** - The link is not a valid URL
/// - **422 Unprocessable Entity** - Form validation failed; nothing is logged
pub async fn generate_link(
    State(state): State<AppState>,
    Json(payload): Json<LinkRequest>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "Validation failed",
                "fields": errors.fields
            })),
        )
            .into_response();
    }

    match state.service.generate(&payload) {
        Ok(generated) => (
            StatusCode::CREATED,
            Json(GenerateResponse {
                link: generated.link,
                saved: generated.persisted,
            }),
        )
            .into_response(),
        Err(err @ ComposeError::InvalidUrl { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": err.message(),
                "code": "invalid_url",
                "context": err.context()
            })),
        )
            .into_response(),
    }
}

/// Returns the last generated link so the form can offer a restore
///
/// - **200 OK** - The stored link
/// - **404 Not Found** - Nothing stored, or the slot is unreadable
pub async fn get_last_link(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.links().get() {
        Some(stored) => (StatusCode::OK, Json(stored)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No stored link",
                "code": "not_found"
            })),
        )
            .into_response(),
    }
}

/// Forgets the last generated link. Clearing an empty slot also succeeds.
pub async fn clear_last_link(State(state): State<AppState>) -> impl IntoResponse {
    state.service.links().clear();
    Json(json!({ "message": "Stored link cleared" }))
}

/// Returns the error log, oldest entry first
///
/// Clients poll this endpoint to refresh a diagnostics view.
pub async fn list_errors(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.service.errors().get_all();
    Json(ErrorListResponse {
        count: data.len(),
        data,
    })
}

pub async fn count_errors(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "count": state.service.errors().count() }))
}

pub async fn clear_errors(State(state): State<AppState>) -> impl IntoResponse {
    state.service.errors().clear();
    Json(json!({ "message": "Error log cleared" }))
}

/// Returns the blank form template with the standard UTM keys
pub async fn form_defaults() -> impl IntoResponse {
    Json(LinkRequest::template())
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
