//! Shared domain types for formcraft.
//!
//! This crate contains the types exchanged between the form runtime, its
//! storage adapters and the CLI/REST surfaces: `FormConfig` and its step
//! variants, persisted form records, response shapes, global configuration
//! and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod config;
pub mod error;
pub mod form;
pub mod record;
pub mod response;
