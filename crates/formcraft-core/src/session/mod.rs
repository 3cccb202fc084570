//! Form session runtime.
//!
//! `FormSession` is the state manager; `validator` holds the pure per-step
//! rules it consults; `staging` computes which responses feed the staged
//! document snapshot; `shaping` builds response values the way renderers
//! are expected to.

pub mod shaping;
pub mod staging;
pub mod state;
pub mod validator;

pub use state::{FormSession, SessionSnapshot};
