//! Step navigation and completion HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions/{id}/next              - Advisory forward move
//! - POST /api/v1/sessions/{id}/prev              - Backward move
//! - POST /api/v1/sessions/{id}/advance           - Forward move gated on validity
//! - GET  /api/v1/sessions/{id}/steps/{index}/valid - Validity of one step (0-based)
//! - POST /api/v1/sessions/{id}/submit            - Complete the form

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use formcraft_observe::attrs;

use crate::http::error::AppError;
use crate::http::handlers::{SessionResult, session_link, view, with_session};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StepValidity {
    pub index: usize,
    pub title: Option<String>,
    pub valid: bool,
}

/// POST /api/v1/sessions/{id}/next - Move forward without checking validity.
pub async fn next_step(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| {
        s.next_step();
        view(&id, s)
    })?;
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

/// POST /api/v1/sessions/{id}/prev - Move back one step.
pub async fn prev_step(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| {
        s.prev_step();
        view(&id, s)
    })?;
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

/// POST /api/v1/sessions/{id}/advance - Move forward only from a valid step.
pub async fn advance(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| s.advance().map(|_| view(&id, s)))??;
    tracing::debug!(
        op = attrs::OP_ADVANCE,
        session_id = %id,
        step = data.session.current_step,
        "Advanced"
    );
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

/// GET /api/v1/sessions/{id}/steps/{index}/valid - Validity of one step.
pub async fn step_valid(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ApiResponse<StepValidity>>, AppError> {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| StepValidity {
        index,
        title: s.step(index).map(|step| step.title.clone()),
        valid: s.is_step_valid(index),
    })?;
    Ok(Json(ApiResponse::timed(data, start)))
}

/// POST /api/v1/sessions/{id}/submit - Mark the form complete.
pub async fn submit(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| s.submit().map(|_| view(&id, s)))??;
    tracing::info!(
        op = attrs::OP_SUBMIT,
        session_id = %id,
        form_id = ?data.session.form_id,
        "Form submitted"
    );
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}
