//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                - Create a session
//! - GET    /api/v1/sessions/{id}           - Get a session snapshot
//! - DELETE /api/v1/sessions/{id}           - Drop a session
//! - POST   /api/v1/sessions/{id}/reset      - Clear responses, keep config
//! - POST   /api/v1/sessions/{id}/reset-form - Clear everything
//! - POST   /api/v1/sessions/{id}/reload     - Reload the persisted config

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use formcraft_core::session::FormSession;
use formcraft_core::store::FormStore;
use formcraft_observe::attrs;
use formcraft_types::form::FormConfig;
use formcraft_types::record::{IconMode, SessionId};

use crate::http::error::AppError;
use crate::http::handlers::{
    SessionResult, SessionView, parse_session_id, session_link, view, with_session,
};
use crate::http::response::ApiResponse;
use crate::state::{AppState, SessionSlot};

/// Request body for session creation.
///
/// With `config`, the session starts from it and `form_id` is only
/// recorded. With just `form_id`, the persisted form is fetched.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub config: Option<FormConfig>,
    #[serde(default, alias = "formId")]
    pub form_id: Option<String>,
    #[serde(default, alias = "iconMode")]
    pub icon_mode: Option<IconMode>,
}

#[derive(Debug, Serialize)]
pub struct DeletedSession {
    pub id: String,
    pub deleted: bool,
}

/// POST /api/v1/sessions - Create a session.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionView>>), AppError> {
    let start = Instant::now();

    let mut session = match (req.config, req.form_id) {
        (Some(config), form_id) => {
            let mut session = FormSession::with_config(config);
            session.set_form_id(form_id);
            session
        }
        (None, Some(form_id)) => {
            FormSession::from_record(state.form_store.fetch_form(&form_id).await?)
        }
        (None, None) => FormSession::new(),
    };
    if let Some(mode) = req.icon_mode {
        session.set_icon_mode(mode);
    }

    let sid = SessionId::new();
    let id = sid.to_string();
    let created = view(&id, &session);
    state.sessions.insert(sid, SessionSlot::new(session));

    tracing::info!(
        op = attrs::OP_CREATE_SESSION,
        session_id = %id,
        form_id = ?created.session.form_id,
        steps = created.session.total_steps,
        "Session created"
    );

    let resp = ApiResponse::timed(created, start).with_link("self", &session_link(&id));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/sessions/{id} - Get a session snapshot.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| view(&id, s))?;
    Ok(Json(
        ApiResponse::timed(data, start)
            .with_link("self", &session_link(&id))
            .with_link("responses", &format!("{}/responses", session_link(&id))),
    ))
}

/// DELETE /api/v1/sessions/{id} - Drop a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedSession>>, AppError> {
    let start = Instant::now();
    let sid = parse_session_id(&id)?;
    if state.sessions.remove(&sid).is_none() {
        return Err(AppError::SessionNotFound(id));
    }
    tracing::info!(session_id = %id, "Session deleted");
    Ok(Json(ApiResponse::timed(DeletedSession { id, deleted: true }, start)))
}

/// POST /api/v1/sessions/{id}/reset - Clear responses and the staged snapshot.
pub async fn reset_responses(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| {
        s.reset_responses();
        view(&id, s)
    })?;
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

/// POST /api/v1/sessions/{id}/reset-form - Clear responses and the config.
pub async fn reset_form(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| {
        s.reset_form();
        view(&id, s)
    })?;
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

/// POST /api/v1/sessions/{id}/reload - Replace the session with the
/// persisted form for its form id.
///
/// The reload runs on a copy so the session entry is not held across the
/// store call. On failure the stored session is left untouched and the
/// error is returned.
pub async fn reload_form(State(state): State<AppState>, Path(id): Path<String>) -> SessionResult {
    let start = Instant::now();

    let mut reloaded = with_session(&state, &id, |s| s.clone())?;
    reloaded
        .reset_server_config(&*state.form_store)
        .await
        .inspect_err(|err| {
            tracing::warn!(
                op = attrs::OP_RELOAD_FORM,
                session_id = %id,
                error = %err,
                "Reload failed"
            );
        })?;

    let data = with_session(&state, &id, |s| {
        *s = reloaded;
        view(&id, s)
    })?;
    tracing::info!(
        op = attrs::OP_RELOAD_FORM,
        session_id = %id,
        form_id = ?data.session.form_id,
        "Session reloaded"
    );

    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}
