//! Form store port.
//!
//! The form store is the external service persisting published forms
//! (`GET /api/forms/:id`). Implementations live in formcraft-infra.

use std::future::Future;

use formcraft_types::error::StoreError;
use formcraft_types::record::FormRecord;

/// Read access to persisted forms.
///
/// Uses RPITIT (return position `impl Trait` in traits) rather than the
/// async_trait macro.
pub trait FormStore: Send + Sync {
    /// Fetch the last-persisted record of a form.
    fn fetch_form(
        &self,
        form_id: &str,
    ) -> impl Future<Output = Result<FormRecord, StoreError>> + Send;
}
