//! Form-step runtime and port trait definitions for formcraft.
//!
//! This crate owns the session state machine, the per-step validators and
//! the staged-document merge. It defines the "ports" (`FormStore`,
//! `QuotationGenerator`) that the infrastructure layer implements and
//! depends only on `formcraft-types` -- never on `formcraft-infra` or any
//! network crate.

pub mod quotation;
pub mod session;
pub mod store;
