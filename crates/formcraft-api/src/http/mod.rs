//! HTTP/REST API layer for formcraft.
//!
//! Axum-based session API at `/api/v1/` with the envelope response format
//! and CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
