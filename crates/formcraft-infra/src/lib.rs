//! Infrastructure layer for formcraft.
//!
//! Contains implementations of the port traits defined in `formcraft-core`:
//! the HTTP and file-backed form stores, the HTTP quotation client, and the
//! global configuration loader.

pub mod client;
pub mod config;
pub mod quotation;
pub mod store;
