//! Response values recorded against form steps.
//!
//! Responses travel as raw JSON because their shape depends on the step
//! type and on whatever the renderer produced. The structs here describe
//! the shapes the terminal renderer writes and the quotation pipeline reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Step title to response value. Also the shape of the staged snapshot.
pub type ResponseMap = serde_json::Map<String, Value>;

/// Key under which extracted document text is synthesized in the staged
/// snapshot.
pub const DOCUMENT_CONTENT_KEY: &str = "documentContent";

/// JavaScript-style truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy; arrays and objects are always
/// truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Response of a followup step: the chosen option plus the follow-up text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupResponse {
    pub option: String,
    pub followup: String,
}

/// Response of a location step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub full_address: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_available: bool,
}

/// Response of a contact step. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response of a documentUpload step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadResponse {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_content: Option<String>,
}
