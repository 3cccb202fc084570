//! HTTP implementation of `FormStore`.
//!
//! Fetches persisted forms from `GET {api_base_url}/api/forms/{id}`. One
//! attempt per call: failures are mapped to `StoreError` and returned.

use reqwest::StatusCode;

use formcraft_core::store::FormStore;
use formcraft_types::error::StoreError;
use formcraft_types::record::FormRecord;

use crate::client::segment_url;

/// Form store backed by the web application's REST API.
#[derive(Clone)]
pub struct HttpFormStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFormStore {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn form_url(&self, form_id: &str) -> Result<reqwest::Url, StoreError> {
        segment_url(&self.base_url, &["api", "forms", form_id]).map_err(StoreError::Connection)
    }
}

impl FormStore for HttpFormStore {
    async fn fetch_form(&self, form_id: &str) -> Result<FormRecord, StoreError> {
        let url = self.form_url(form_id)?;
        tracing::debug!(%url, "Fetching form");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<FormRecord>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
