//! PUT /api/v1/sessions/{id}/responses - Record a response for a step.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;

use formcraft_observe::attrs;

use crate::http::error::AppError;
use crate::http::handlers::{SessionResult, session_link, view, with_session};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateResponseRequest {
    /// Title of the step being answered.
    pub title: String,
    pub value: Value,
}

pub async fn update_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateResponseRequest>,
) -> SessionResult {
    let start = Instant::now();
    if req.title.is_empty() {
        return Err(AppError::Validation("Step title must not be empty".to_string()));
    }

    let data = with_session(&state, &id, |s| {
        s.update_response(&req.title, req.value);
        view(&id, s)
    })?;
    tracing::debug!(
        op = attrs::OP_UPDATE_RESPONSE,
        session_id = %id,
        title = %req.title,
        staged = data.session.temp_json.len(),
        "Response recorded"
    );

    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::session::{CreateSessionRequest, create_session};
    use crate::http::handlers::test_support::{offline_state, quote_config};
    use serde_json::json;

    async fn session_id(state: &AppState) -> String {
        let (_, Json(resp)) = create_session(
            State(state.clone()),
            Json(CreateSessionRequest {
                config: Some(quote_config()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        resp.data.unwrap().id
    }

    async fn put(state: &AppState, id: &str, title: &str, value: Value) -> SessionResult {
        update_response(
            State(state.clone()),
            Path(id.to_string()),
            Json(UpdateResponseRequest {
                title: title.to_string(),
                value,
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_responses_before_upload_are_staged() {
        let state = offline_state();
        let id = session_id(&state).await;

        put(&state, &id, "Service", json!("fence")).await.unwrap();
        let Json(resp) = put(
            &state,
            &id,
            "Upload",
            json!({"fileName": "plan.pdf", "extractedText": "20m fence"}),
        )
        .await
        .unwrap();

        let data = resp.data.unwrap();
        assert_eq!(data.session.temp_json["Service"], "fence");
        assert_eq!(data.session.temp_json["documentContent"], "20m fence");
        assert!(data.session.current_step_valid);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let state = offline_state();
        let id = session_id(&state).await;
        let err = put(&state, &id, "", json!("x")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
