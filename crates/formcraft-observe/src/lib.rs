//! Observability for formcraft: subscriber setup and the operation names
//! attached to session events.

pub mod attrs;
pub mod tracing_setup;
