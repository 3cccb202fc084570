//! Staged document snapshot planning.
//!
//! The staged snapshot collects every response up to and including the
//! first `documentUpload` step (the checkpoint), plus the text extracted
//! from the uploaded document. The plan is computed once per config and
//! answers, for a given title, whether a response is collected and whether
//! it comes from the checkpoint itself.

use std::collections::HashMap;

use serde_json::Value;

use formcraft_types::form::FormConfig;
use formcraft_types::response::{DOCUMENT_CONTENT_KEY, ResponseMap, is_truthy};

/// Which titles feed the staged snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingPlan {
    checkpoint: Option<usize>,
    /// Title to index of its first occurrence, for steps up to the checkpoint.
    collectible: HashMap<String, usize>,
}

/// What a response update contributes to the staged snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staging {
    /// The step lies after the checkpoint, or there is no checkpoint.
    Skip,
    /// The step lies before the checkpoint.
    Collect,
    /// The step is the checkpoint; document text is extracted as well.
    Checkpoint,
}

impl StagingPlan {
    /// Build the plan for a config. Without a `documentUpload` step the
    /// plan collects nothing.
    pub fn for_config(config: &FormConfig) -> Self {
        let Some(checkpoint) = config.document_upload_index() else {
            return Self::default();
        };

        let mut collectible = HashMap::new();
        for (index, step) in config.steps.iter().enumerate().take(checkpoint + 1) {
            collectible.entry(step.title.clone()).or_insert(index);
        }

        Self {
            checkpoint: Some(checkpoint),
            collectible,
        }
    }

    pub fn checkpoint(&self) -> Option<usize> {
        self.checkpoint
    }

    /// Classify an update to `title`.
    ///
    /// Repeated titles resolve to their first occurrence, so an upload step
    /// sharing its title with an earlier step is treated as that earlier step.
    pub fn classify(&self, title: &str) -> Staging {
        match (self.checkpoint, self.collectible.get(title)) {
            (Some(checkpoint), Some(&index)) if index == checkpoint => Staging::Checkpoint,
            (Some(_), Some(_)) => Staging::Collect,
            _ => Staging::Skip,
        }
    }

    /// Apply a response update to the staged snapshot.
    pub fn apply(&self, staged: &mut ResponseMap, title: &str, value: &Value) {
        let staging = self.classify(title);
        if staging == Staging::Skip {
            return;
        }

        staged.insert(title.to_string(), value.clone());

        if staging == Staging::Checkpoint {
            if let Some(text) = extracted_text(value) {
                staged.insert(DOCUMENT_CONTENT_KEY.to_string(), text.clone());
            }
        }
    }
}

/// Extracted document text of an upload response, preferring
/// `extractedText` over `documentContent`. Falsy values are skipped.
pub fn extracted_text(value: &Value) -> Option<&Value> {
    ["extractedText", "documentContent"]
        .into_iter()
        .filter_map(|key| value.get(key))
        .find(|v| is_truthy(v))
}
