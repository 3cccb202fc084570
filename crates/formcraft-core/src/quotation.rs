//! Quotation generation over the staged snapshot.
//!
//! The documentInfo step asks an external service to price the request
//! described by the staged snapshot. The service answers with either plain
//! text or HTML.

use std::future::Future;

use serde::{Deserialize, Serialize};

use formcraft_types::error::QuotationError;
use formcraft_types::response::ResponseMap;

use crate::session::FormSession;

/// A generated quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum Quotation {
    Text(String),
    Html(String),
}

impl Quotation {
    pub fn body(&self) -> &str {
        match self {
            Quotation::Text(body) | Quotation::Html(body) => body,
        }
    }
}

/// Port for the external quotation service.
pub trait QuotationGenerator: Send + Sync {
    fn generate(
        &self,
        staged: &ResponseMap,
    ) -> impl Future<Output = Result<Quotation, QuotationError>> + Send;
}

/// Requests quotations for sessions.
pub struct QuotationService<G: QuotationGenerator> {
    generator: G,
}

impl<G: QuotationGenerator> QuotationService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Generate a quotation from the session's staged snapshot.
    ///
    /// Fails with `NothingStaged` before anything has reached the snapshot.
    /// No retry is attempted.
    pub async fn quote(&self, session: &FormSession) -> Result<Quotation, QuotationError> {
        self.quote_staged(session.staged()).await
    }

    /// Generate a quotation from an already-extracted staged snapshot.
    pub async fn quote_staged(&self, staged: &ResponseMap) -> Result<Quotation, QuotationError> {
        if staged.is_empty() {
            return Err(QuotationError::NothingStaged);
        }

        match self.generator.generate(staged).await {
            Ok(quotation) => {
                tracing::info!(entries = staged.len(), "Quotation generated");
                Ok(quotation)
            }
            Err(err) => {
                tracing::error!(error = %err, "Quotation generation failed");
                Err(err)
            }
        }
    }
}
