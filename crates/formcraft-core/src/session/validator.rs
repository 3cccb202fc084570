//! Per-step validation rules.
//!
//! Pure functions over a step definition and the response map. A step is
//! valid when its current response is acceptable for moving on. Unknown
//! step types are always valid.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use formcraft_types::form::{FormStep, StepKind, StepValidation};
use formcraft_types::response::{ResponseMap, is_truthy};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Whether `step` accepts the response currently recorded under its title.
pub fn is_step_valid(step: &FormStep, responses: &ResponseMap) -> bool {
    validate_response(step, responses.get(&step.title))
}

/// Whether `response` is acceptable for `step`.
pub fn validate_response(step: &FormStep, response: Option<&Value>) -> bool {
    match &step.kind {
        StepKind::Tiles { .. } | StepKind::DocumentUpload { .. } => present(response),
        StepKind::MultiSelect { .. } => response
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty()),
        StepKind::Dropdown { validation, .. } => optional(validation) || present(response),
        StepKind::Slider { .. } | StepKind::DocumentInfo {} | StepKind::Unknown => true,
        StepKind::Followup { .. } => followup_valid(response),
        StepKind::Textbox { validation, .. } => {
            // minLength is deliberately not enforced here.
            optional(validation)
                || response
                    .and_then(Value::as_str)
                    .is_some_and(|text| !text.trim().is_empty())
        }
        StepKind::Location { validation, .. } => {
            optional(validation)
                || response
                    .and_then(|r| r.get("postalCode"))
                    .is_some_and(is_truthy)
        }
        StepKind::Contact { .. } => contact_valid(response),
    }
}

/// Whether `email` looks like an address (`local@domain.tld`).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn present(response: Option<&Value>) -> bool {
    response.is_some_and(is_truthy)
}

fn optional(validation: &Option<StepValidation>) -> bool {
    validation.as_ref().is_some_and(StepValidation::is_optional)
}

/// The renderer writes `{option, followup}`; older clients wrote
/// `{option, value}`. Either second key is accepted.
fn followup_valid(response: Option<&Value>) -> bool {
    let Some(obj) = response.and_then(Value::as_object) else {
        return false;
    };
    obj.contains_key("option") && (obj.contains_key("followup") || obj.contains_key("value"))
}

fn contact_valid(response: Option<&Value>) -> bool {
    let Some(contact) = response else {
        return true;
    };
    let field = |name: &str| {
        contact
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    match (field("firstName"), field("email")) {
        (None, None) => true,
        (Some(_), None) => false,
        (_, Some(email)) => is_valid_email(email),
    }
}
