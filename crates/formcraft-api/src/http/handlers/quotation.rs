//! POST /api/v1/sessions/{id}/quotation - Price the staged snapshot.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use formcraft_core::quotation::Quotation;
use formcraft_observe::attrs;

use crate::http::error::AppError;
use crate::http::handlers::{session_link, with_session};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// The staged snapshot is copied out so the session is not locked while
/// the quotation service runs.
pub async fn generate_quotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Quotation>>, AppError> {
    let start = Instant::now();
    let staged = with_session(&state, &id, |s| s.staged().clone())?;

    tracing::info!(
        op = attrs::OP_GENERATE_QUOTATION,
        session_id = %id,
        entries = staged.len(),
        "Requesting quotation"
    );
    let quotation = state.quotation_service.quote_staged(&staged).await?;

    Ok(Json(
        ApiResponse::timed(quotation, start).with_link("session", &session_link(&id)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::session::{CreateSessionRequest, create_session};
    use crate::http::handlers::test_support::{offline_state, quote_config};
    use formcraft_types::error::QuotationError;
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

    #[tokio::test]
    async fn test_nothing_staged() {
        let state = offline_state();
        let id = session_id(&state).await;

        let err = generate_quotation(State(state), Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::Quotation(QuotationError::NothingStaged)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let state = offline_state();
        let id = session_id(&state).await;
        with_session(&state, &id, |s| {
            s.update_response("Upload", json!({"extractedText": "deck"}));
        })
        .unwrap();

        let err = generate_quotation(State(state), Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::Quotation(QuotationError::Connection(_))));
    }
}
