//! Operation names recorded as the `op` field on session events and spans.
//!
//! Shared by the REST handlers and the terminal renderer so logs from both
//! surfaces filter the same way.

/// Creating a session, optionally from a persisted form.
pub const OP_CREATE_SESSION: &str = "create_session";

/// Reloading the persisted config for a session's form id.
pub const OP_RELOAD_FORM: &str = "reload_form";

/// Recording a response for a step.
pub const OP_UPDATE_RESPONSE: &str = "update_response";

/// Gated forward navigation.
pub const OP_ADVANCE: &str = "advance";

/// Requesting a quotation from the staged snapshot.
pub const OP_GENERATE_QUOTATION: &str = "generate_quotation";

/// Final form submission.
pub const OP_SUBMIT: &str = "submit";
