use thiserror::Error;

/// Errors raised by gated session transitions.
///
/// Most session operations are permissive and never fail; these cover the
/// few that refuse a transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no form config loaded")]
    NoConfig,

    #[error("step {step} ('{title}') is not valid")]
    InvalidStep { step: usize, title: String },

    #[error("already at the last step")]
    AtLastStep,

    #[error("form can only be submitted from the last step")]
    NotOnLastStep,

    #[error("session has no form id")]
    NoFormId,
}

/// Errors from the external form store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("form store unreachable: {0}")]
    Connection(String),

    #[error("form not found")]
    NotFound,

    #[error("form store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid form payload: {0}")]
    Decode(String),
}

/// Why a reload from the form store left the session unchanged.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from quotation generation.
#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("nothing staged for quotation")]
    NothingStaged,

    #[error("quotation service unreachable: {0}")]
    Connection(String),

    #[error("quotation service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("quotation response had neither 'quotation' nor 'quotationHtml'")]
    EmptyResponse,

    #[error("invalid quotation payload: {0}")]
    Decode(String),
}
