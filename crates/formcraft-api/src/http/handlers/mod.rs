//! HTTP request handlers for the session API.

pub mod navigation;
pub mod quotation;
pub mod response;
pub mod session;
pub mod theme;

use std::time::Instant;

use axum::Json;
use serde::Serialize;

use formcraft_core::session::{FormSession, SessionSnapshot};
use formcraft_types::record::SessionId;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Snapshot of a session tagged with its registry id.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

pub type SessionResult = Result<Json<ApiResponse<SessionView>>, AppError>;

/// Parse a session id from a path parameter, returning a 400 on bad format.
pub(crate) fn parse_session_id(s: &str) -> Result<SessionId, AppError> {
    s.parse::<SessionId>()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {s}")))
}

/// Run `f` against a live session, marking it as recently used.
///
/// The map entry stays locked for the duration of `f`, so `f` must not
/// block or await.
pub(crate) fn with_session<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut FormSession) -> T,
) -> Result<T, AppError> {
    let sid = parse_session_id(id)?;
    let mut entry = state
        .sessions
        .get_mut(&sid)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
    let slot = entry.value_mut();
    slot.last_seen = Instant::now();
    Ok(f(&mut slot.session))
}

pub(crate) fn view(id: &str, session: &FormSession) -> SessionView {
    SessionView {
        id: id.to_string(),
        session: session.snapshot(),
    }
}

pub(crate) fn session_link(id: &str) -> String {
    format!("/api/v1/sessions/{id}")
}
