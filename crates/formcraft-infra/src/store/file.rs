//! File-backed form store.
//!
//! Records live at `{dir}/{form_id}.json`. Used for offline filling and for
//! loading a config file handed to the CLI directly.

use std::path::{Path, PathBuf};

use formcraft_core::store::FormStore;
use formcraft_types::error::StoreError;
use formcraft_types::form::FormConfig;
use formcraft_types::record::FormRecord;

/// Form store reading JSON records from a directory.
pub struct FileFormStore {
    dir: PathBuf,
}

impl FileFormStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, form_id: &str) -> PathBuf {
        self.dir.join(format!("{form_id}.json"))
    }
}

impl FormStore for FileFormStore {
    async fn fetch_form(&self, form_id: &str) -> Result<FormRecord, StoreError> {
        // Reject ids that would escape the store directory.
        if form_id.is_empty() || form_id.contains(['/', '\\']) || form_id.contains("..") {
            return Err(StoreError::NotFound);
        }

        let content = match tokio::fs::read_to_string(self.record_path(form_id)).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound);
            }
            Err(err) => return Err(StoreError::Connection(err.to_string())),
        };

        let mut record: FormRecord =
            serde_json::from_str(&content).map_err(|e| StoreError::Decode(e.to_string()))?;
        if record.id.is_empty() {
            record.id = form_id.to_string();
        }
        Ok(record)
    }
}

/// What a form file on disk contained.
#[derive(Debug)]
pub enum FormFile {
    /// A full persisted record (`{ id, config, ... }`).
    Record(FormRecord),
    /// A bare `FormConfig` (`{ theme, steps, ... }`).
    Config(FormConfig),
}

/// Load a form file that holds either a persisted record or a bare config.
pub async fn load_form_file(path: &Path) -> Result<FormFile, StoreError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Connection(format!("{}: {e}", path.display())))?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| StoreError::Decode(e.to_string()))?;

    if value.get("config").is_some() {
        serde_json::from_value(value)
            .map(FormFile::Record)
            .map_err(|e| StoreError::Decode(e.to_string()))
    } else {
        serde_json::from_value(value)
            .map(FormFile::Config)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
