//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use formcraft_types::error::{QuotationError, ReloadError, SessionError, StoreError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Refused session transition.
    Session(SessionError),
    /// Form store failure.
    Store(StoreError),
    /// Quotation service failure.
    Quotation(QuotationError),
    /// No session with the given id.
    SessionNotFound(String),
    /// Malformed request.
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ReloadError> for AppError {
    fn from(e: ReloadError) -> Self {
        match e {
            ReloadError::Session(e) => AppError::Session(e),
            ReloadError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<QuotationError> for AppError {
    fn from(e: QuotationError) -> Self {
        AppError::Quotation(e)
    }
}

impl AppError {
    /// Status code and machine-readable error code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Session(SessionError::NoConfig) => (StatusCode::CONFLICT, "NO_CONFIG"),
            AppError::Session(SessionError::InvalidStep { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "STEP_INVALID")
            }
            AppError::Session(SessionError::AtLastStep) => (StatusCode::CONFLICT, "AT_LAST_STEP"),
            AppError::Session(SessionError::NotOnLastStep) => {
                (StatusCode::CONFLICT, "NOT_ON_LAST_STEP")
            }
            AppError::Session(SessionError::NoFormId) => (StatusCode::CONFLICT, "NO_FORM_ID"),
            AppError::Store(StoreError::NotFound) => (StatusCode::NOT_FOUND, "FORM_NOT_FOUND"),
            AppError::Store(_) => (StatusCode::BAD_GATEWAY, "FORM_STORE_ERROR"),
            AppError::Quotation(QuotationError::NothingStaged) => {
                (StatusCode::CONFLICT, "NOTHING_STAGED")
            }
            AppError::Quotation(_) => (StatusCode::BAD_GATEWAY, "QUOTATION_ERROR"),
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Session(e) => e.to_string(),
            AppError::Store(e) => e.to_string(),
            AppError::Quotation(e) => e.to_string(),
            AppError::SessionNotFound(id) => format!("Session '{id}' not found"),
            AppError::Validation(msg) => msg.clone(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Session(SessionError::InvalidStep { step, title }) => {
                Some(json!({ "step": step, "title": title }))
            }
            AppError::Store(StoreError::Status { status, .. })
            | AppError::Quotation(QuotationError::Status { status, .. }) => {
                Some(json!({ "upstream_status": status }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        } else {
            tracing::debug!(code, %message, "Request rejected");
        }

        let body = ApiResponse::error(
            code,
            &message,
            self.details(),
            uuid::Uuid::now_v7().to_string(),
        );
        (status, Json(body)).into_response()
    }
}
