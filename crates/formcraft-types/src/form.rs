//! Form configuration types.
//!
//! A `FormConfig` is the JSON document produced by the generation service:
//! a theme plus an ordered list of steps. Each step is tagged by `type` and
//! carries the option/validation schema of its variant. Field names follow
//! the camelCase wire format used by the web client.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FormConfig
// ---------------------------------------------------------------------------

/// A complete multi-step form definition.
///
/// Treated as immutable once loaded into a session; edits produce a new
/// config rather than mutating the loaded one (theme mutators excepted).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub steps: Vec<FormStep>,
    /// Presentation hints passed through to the renderer untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<serde_json::Value>,
    /// Submission settings passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<serde_json::Value>,
}

impl FormConfig {
    /// Index of the first step with the given title.
    ///
    /// Titles double as response keys, so a form with repeated titles
    /// always resolves to the earliest occurrence.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.title == title)
    }

    /// Index of the first `documentUpload` step, if any.
    pub fn document_upload_index(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|s| s.step_type() == StepType::DocumentUpload)
    }

    /// Titles that occur on more than one step, in first-seen order.
    pub fn duplicate_titles(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut duplicates = Vec::new();
        for step in &self.steps {
            let count = seen.entry(step.title.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(step.title.clone());
            }
        }
        duplicates
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Form theming: named color channels plus a font family.
///
/// Keys the runtime does not know about are preserved in `extra` so a
/// theme round-trips without loss.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Color channel name (e.g. "primary", "background") to hex string.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One page of a multi-step form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStep {
    /// Optional stable identifier. Not used as a response key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display title, also the key into the response map.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl FormStep {
    /// Build a step from a title and variant payload.
    pub fn new(title: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: None,
            title: title.into(),
            subtitle: None,
            kind,
        }
    }

    pub fn step_type(&self) -> StepType {
        self.kind.step_type()
    }
}

/// Variant payload of a step, internally tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepKind {
    /// Single choice rendered as tiles.
    Tiles {
        #[serde(default)]
        options: Vec<StepOption>,
    },
    /// Any number of choices; the response is the list of chosen option ids.
    MultiSelect {
        #[serde(default)]
        options: Vec<StepOption>,
    },
    /// Numeric range with an implicit default value.
    Slider {
        #[serde(default)]
        min: f64,
        #[serde(default = "default_slider_max")]
        max: f64,
        #[serde(default = "default_slider_step")]
        step: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// Single choice followed by a free-text follow-up question.
    Followup {
        #[serde(default)]
        options: Vec<StepOption>,
    },
    /// Free text.
    Textbox {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<StepValidation>,
    },
    /// Address with postal code and service availability.
    Location {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<StepValidation>,
    },
    /// Contact details (first name, last name, email, phone).
    Contact {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<StepValidation>,
    },
    /// File upload whose extracted text feeds quotation generation.
    DocumentUpload {
        #[serde(default)]
        accept: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_size_mb: Option<u32>,
    },
    /// Informational step showing data derived from the staged snapshot.
    DocumentInfo {},
    /// Single choice from a drop-down list.
    Dropdown {
        #[serde(default)]
        options: Vec<StepOption>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<StepValidation>,
    },
    /// Any `type` this runtime does not recognise.
    #[serde(other)]
    Unknown,
}

fn default_slider_max() -> f64 {
    100.0
}

fn default_slider_step() -> f64 {
    1.0
}

impl StepKind {
    pub fn step_type(&self) -> StepType {
        match self {
            StepKind::Tiles { .. } => StepType::Tiles,
            StepKind::MultiSelect { .. } => StepType::MultiSelect,
            StepKind::Slider { .. } => StepType::Slider,
            StepKind::Followup { .. } => StepType::Followup,
            StepKind::Textbox { .. } => StepType::Textbox,
            StepKind::Location { .. } => StepType::Location,
            StepKind::Contact { .. } => StepType::Contact,
            StepKind::DocumentUpload { .. } => StepType::DocumentUpload,
            StepKind::DocumentInfo {} => StepType::DocumentInfo,
            StepKind::Dropdown { .. } => StepType::Dropdown,
            StepKind::Unknown => StepType::Unknown,
        }
    }

    /// Validation block of the variants that carry one.
    pub fn validation(&self) -> Option<&StepValidation> {
        match self {
            StepKind::Textbox { validation, .. }
            | StepKind::Location { validation, .. }
            | StepKind::Contact { validation }
            | StepKind::Dropdown { validation, .. } => validation.as_ref(),
            _ => None,
        }
    }

    /// Options of the choice-based variants (empty for the others).
    pub fn options(&self) -> &[StepOption] {
        match self {
            StepKind::Tiles { options }
            | StepKind::MultiSelect { options }
            | StepKind::Followup { options }
            | StepKind::Dropdown { options, .. } => options,
            _ => &[],
        }
    }
}

/// Discriminant of [`StepKind`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepType {
    Tiles,
    MultiSelect,
    Slider,
    Followup,
    Textbox,
    Location,
    Contact,
    DocumentUpload,
    DocumentInfo,
    Dropdown,
    Unknown,
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepType::Tiles => "tiles",
            StepType::MultiSelect => "multiSelect",
            StepType::Slider => "slider",
            StepType::Followup => "followup",
            StepType::Textbox => "textbox",
            StepType::Location => "location",
            StepType::Contact => "contact",
            StepType::DocumentUpload => "documentUpload",
            StepType::DocumentInfo => "documentInfo",
            StepType::Dropdown => "dropdown",
            StepType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A selectable option of a tiles/multiSelect/followup/dropdown step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOption {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Follow-up prompt shown after this option is chosen (followup steps).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followup: Option<FollowupPrompt>,
}

impl StepOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            icon: None,
            followup: None,
        }
    }
}

/// Follow-up question attached to an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupPrompt {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Per-step validation settings.
///
/// `min_length`/`max_length` are carried for the renderer; the runtime
/// validator only consults `required`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl StepValidation {
    /// True only when `required` is explicitly `false`.
    pub fn is_optional(&self) -> bool {
        self.required == Some(false)
    }
}
