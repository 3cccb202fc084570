//! Axum router configuration with middleware.
//!
//! All session routes are under `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session lifecycle
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/reset", post(handlers::session::reset_responses))
        .route("/sessions/{id}/reset-form", post(handlers::session::reset_form))
        .route("/sessions/{id}/reload", post(handlers::session::reload_form))
        // Responses
        .route(
            "/sessions/{id}/responses",
            put(handlers::response::update_response),
        )
        // Navigation
        .route("/sessions/{id}/next", post(handlers::navigation::next_step))
        .route("/sessions/{id}/prev", post(handlers::navigation::prev_step))
        .route("/sessions/{id}/advance", post(handlers::navigation::advance))
        .route(
            "/sessions/{id}/steps/{index}/valid",
            get(handlers::navigation::step_valid),
        )
        .route("/sessions/{id}/submit", post(handlers::navigation::submit))
        // Theme
        .route("/sessions/{id}/theme", patch(handlers::theme::update_theme))
        // Quotation
        .route(
            "/sessions/{id}/quotation",
            post(handlers::quotation::generate_quotation),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness probe.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
