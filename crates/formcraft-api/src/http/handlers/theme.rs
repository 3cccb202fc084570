//! PATCH /api/v1/sessions/{id}/theme - Update theme colors and font.
//!
//! Values are stored as given; neither hex strings nor font names are
//! checked.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use formcraft_types::error::SessionError;

use crate::http::handlers::{SessionResult, session_link, view, with_session};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ThemePatch {
    /// Channel name to hex color, e.g. `{"primary": "#3366ff"}`.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default, alias = "fontFamily")]
    pub font_family: Option<String>,
}

pub async fn update_theme(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ThemePatch>,
) -> SessionResult {
    let start = Instant::now();
    let data = with_session(&state, &id, |s| {
        if s.config().is_none() {
            return Err(SessionError::NoConfig);
        }
        for (channel, hex) in &patch.colors {
            s.update_theme_color(channel, hex);
        }
        if let Some(family) = &patch.font_family {
            s.update_font_family(family);
        }
        Ok(view(&id, s))
    })??;
    Ok(Json(ApiResponse::timed(data, start).with_link("self", &session_link(&id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::AppError;
    use crate::http::handlers::session::{CreateSessionRequest, create_session};
    use crate::http::handlers::test_support::{offline_state, quote_config};

    async fn create(state: &AppState, with_config: bool) -> String {
        let (_, Json(resp)) = create_session(
            State(state.clone()),
            Json(CreateSessionRequest {
                config: with_config.then(quote_config),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        resp.data.unwrap().id
    }

    #[tokio::test]
    async fn test_patch_sets_colors_and_font() {
        let state = offline_state();
        let id = create(&state, true).await;

        let patch = ThemePatch {
            colors: BTreeMap::from([
                ("primary".to_string(), "#112233".to_string()),
                ("background".to_string(), "not-a-color".to_string()),
            ]),
            font_family: Some("Inter".to_string()),
        };
        let Json(resp) = update_theme(State(state.clone()), Path(id), Json(patch))
            .await
            .unwrap();

        let theme = resp.data.unwrap().session.theme.unwrap();
        assert_eq!(theme.colors["primary"], "#112233");
        assert_eq!(theme.colors["background"], "not-a-color");
        assert_eq!(theme.font_family.as_deref(), Some("Inter"));
    }

    #[tokio::test]
    async fn test_patch_without_config_is_rejected() {
        let state = offline_state();
        let id = create(&state, false).await;

        let err = update_theme(State(state), Path(id), Json(ThemePatch::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Session(SessionError::NoConfig)));
    }
}
