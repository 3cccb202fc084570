//! HTTP implementation of `QuotationGenerator`.
//!
//! Posts the staged snapshot to `{api_base_url}/api/generate-quotation` as
//! `{ "tempJson": { ... } }`. The service answers `{ "quotationHtml" }` or
//! `{ "quotation" }`; HTML wins when both are present.

use serde::{Deserialize, Serialize};

use formcraft_core::quotation::{Quotation, QuotationGenerator};
use formcraft_types::error::QuotationError;
use formcraft_types::response::ResponseMap;

use crate::client::join_url;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotationRequest<'a> {
    temp_json: &'a ResponseMap,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotationResponse {
    #[serde(default)]
    quotation: Option<String>,
    #[serde(default)]
    quotation_html: Option<String>,
}

impl QuotationResponse {
    fn into_quotation(self) -> Result<Quotation, QuotationError> {
        match (self.quotation_html, self.quotation) {
            (Some(html), _) if !html.is_empty() => Ok(Quotation::Html(html)),
            (_, Some(text)) if !text.is_empty() => Ok(Quotation::Text(text)),
            _ => Err(QuotationError::EmptyResponse),
        }
    }
}

/// Quotation client backed by the web application's REST API.
#[derive(Clone)]
pub struct HttpQuotationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpQuotationClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl QuotationGenerator for HttpQuotationClient {
    async fn generate(&self, staged: &ResponseMap) -> Result<Quotation, QuotationError> {
        let url = join_url(&self.base_url, "/api/generate-quotation");

        let response = self
            .http
            .post(&url)
            .json(&QuotationRequest { temp_json: staged })
            .send()
            .await
            .map_err(|e| QuotationError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(QuotationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<QuotationResponse>()
            .await
            .map_err(|e| QuotationError::Decode(e.to_string()))?
            .into_quotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn spawn_service(reply: fn(&Value) -> (StatusCode, Value)) -> String {
        let app = Router::new().route(
            "/api/generate-quotation",
            post(move |Json(body): Json<Value>| async move {
                let (status, payload) = reply(&body);
                (status, Json(payload))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn staged() -> ResponseMap {
        let mut staged = ResponseMap::new();
        staged.insert("documentContent".to_string(), json!("fence, 20m"));
        staged
    }

    #[tokio::test]
    async fn test_text_quotation_echoes_snapshot() {
        let base = spawn_service(|body| {
            let content = body["tempJson"]["documentContent"].as_str().unwrap_or("");
            (StatusCode::OK, json!({"quotation": format!("Quote: {content}")}))
        })
        .await;
        let client = HttpQuotationClient::new(reqwest::Client::new(), base);

        let quotation = client.generate(&staged()).await.unwrap();
        assert_eq!(quotation, Quotation::Text("Quote: fence, 20m".to_string()));
    }

    #[tokio::test]
    async fn test_html_quotation_preferred() {
        let base = spawn_service(|_| {
            (
                StatusCode::OK,
                json!({"quotation": "plain", "quotationHtml": "<b>rich</b>"}),
            )
        })
        .await;
        let client = HttpQuotationClient::new(reqwest::Client::new(), base);

        let quotation = client.generate(&staged()).await.unwrap();
        assert_eq!(quotation, Quotation::Html("<b>rich</b>".to_string()));
    }

    #[tokio::test]
    async fn test_empty_response_is_an_error() {
        let base = spawn_service(|_| (StatusCode::OK, json!({}))).await;
        let client = HttpQuotationClient::new(reqwest::Client::new(), base);

        let err = client.generate(&staged()).await.unwrap_err();
        assert!(matches!(err, QuotationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let base = spawn_service(|_| {
            (StatusCode::PAYMENT_REQUIRED, json!({"error": "out of credits"}))
        })
        .await;
        let client = HttpQuotationClient::new(reqwest::Client::new(), base);

        let err = client.generate(&staged()).await.unwrap_err();
        match err {
            QuotationError::Status { status, message } => {
                assert_eq!(status, 402);
                assert!(message.contains("out of credits"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
