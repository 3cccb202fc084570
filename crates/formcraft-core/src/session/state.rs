//! Form session state manager.
//!
//! `FormSession` owns the loaded config, the response map, the staged
//! document snapshot and the step cursor. The cursor is 1-based and stays
//! within `[1, total_steps]`. Operations never panic: unknown titles are
//! stored as orphaned data, theme mutators without a config are no-ops,
//! and store failures during reload leave the session untouched.
//!
//! Two ways to move forward exist. `next_step` is advisory and ignores
//! validation, for renderers that gate on `validate_current_step`
//! themselves. `advance` refuses to leave an invalid step.

use serde::Serialize;
use serde_json::Value;

use formcraft_types::error::{ReloadError, SessionError};
use formcraft_types::form::{FormConfig, FormStep, Theme};
use formcraft_types::record::{FormRecord, IconMode};
use formcraft_types::response::ResponseMap;

use super::staging::StagingPlan;
use super::validator;
use crate::store::FormStore;

/// In-memory state of one form-filling session.
#[derive(Debug, Clone)]
pub struct FormSession {
    config: Option<FormConfig>,
    form_id: Option<String>,
    prompt_history: Vec<Value>,
    responses: ResponseMap,
    staged: ResponseMap,
    current_step: usize,
    is_submitting: bool,
    is_form_complete: bool,
    icon_mode: IconMode,
    staging: StagingPlan,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// An empty session with no config loaded.
    pub fn new() -> Self {
        Self {
            config: None,
            form_id: None,
            prompt_history: Vec::new(),
            responses: ResponseMap::new(),
            staged: ResponseMap::new(),
            current_step: 1,
            is_submitting: false,
            is_form_complete: false,
            icon_mode: IconMode::default(),
            staging: StagingPlan::default(),
        }
    }

    /// A session with `config` already loaded.
    pub fn with_config(config: FormConfig) -> Self {
        let mut session = Self::new();
        session.set_form_config(config);
        session
    }

    /// A session loaded from a persisted record.
    pub fn from_record(record: FormRecord) -> Self {
        let mut session = Self::new();
        session.load_record(record);
        session
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> Option<&FormConfig> {
        self.config.as_ref()
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn set_form_id(&mut self, form_id: Option<String>) {
        self.form_id = form_id;
    }

    pub fn prompt_history(&self) -> &[Value] {
        &self.prompt_history
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    /// The staged document snapshot (`tempJson`).
    pub fn staged(&self) -> &ResponseMap {
        &self.staged
    }

    /// 1-based cursor.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.config.as_ref().map_or(0, |c| c.steps.len())
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn set_submitting(&mut self, submitting: bool) {
        self.is_submitting = submitting;
    }

    pub fn is_form_complete(&self) -> bool {
        self.is_form_complete
    }

    pub fn icon_mode(&self) -> IconMode {
        self.icon_mode
    }

    pub fn set_icon_mode(&mut self, mode: IconMode) {
        self.icon_mode = mode;
    }

    /// Step at a 0-based index.
    pub fn step(&self, index: usize) -> Option<&FormStep> {
        self.config.as_ref()?.steps.get(index)
    }

    /// Step under the cursor.
    pub fn current(&self) -> Option<&FormStep> {
        self.step(self.current_step.checked_sub(1)?)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.total_steps()
    }

    // -----------------------------------------------------------------------
    // Config lifecycle
    // -----------------------------------------------------------------------

    /// Replace the active config and reset all per-form state.
    ///
    /// Nothing recorded against the previous form survives: the cursor
    /// returns to 1 and responses, staged snapshot, completion flag and
    /// prompt history are cleared.
    pub fn set_form_config(&mut self, config: FormConfig) {
        self.staging = StagingPlan::for_config(&config);
        self.config = Some(config);
        self.prompt_history.clear();
        self.clear_progress();
        tracing::debug!(
            steps = self.total_steps(),
            checkpoint = ?self.staging.checkpoint(),
            "Loaded form config"
        );
    }

    /// Replace the session state with a persisted record.
    pub fn load_record(&mut self, record: FormRecord) {
        self.set_form_config(record.config);
        self.form_id = Some(record.id);
        self.prompt_history = record.prompt_history;
        self.icon_mode = record.icon_mode;
    }

    /// Clear responses and the staged snapshot, keeping config and form id.
    pub fn reset_responses(&mut self) {
        self.clear_progress();
    }

    /// Clear everything including the config itself.
    pub fn reset_form(&mut self) {
        self.config = None;
        self.staging = StagingPlan::default();
        self.clear_progress();
    }

    /// Reload the last-persisted config for this session's form id.
    ///
    /// Failures are logged and the current state is kept; the error is
    /// still returned so callers can report it.
    pub async fn reset_server_config<S: FormStore>(
        &mut self,
        store: &S,
    ) -> Result<(), ReloadError> {
        let Some(form_id) = self.form_id.clone() else {
            tracing::warn!("Cannot reload form config: session has no form id");
            return Err(SessionError::NoFormId.into());
        };

        match store.fetch_form(&form_id).await {
            Ok(record) => {
                self.load_record(record);
                tracing::info!(form_id = %form_id, "Reloaded form config from store");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    form_id = %form_id,
                    error = %err,
                    "Reload failed, keeping stale state"
                );
                Err(err.into())
            }
        }
    }

    fn clear_progress(&mut self) {
        self.responses.clear();
        self.staged.clear();
        self.current_step = 1;
        self.is_submitting = false;
        self.is_form_complete = false;
    }

    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    /// Record `value` as the response to the step titled `title`.
    ///
    /// Steps at or before the first documentUpload step also write into the
    /// staged snapshot; the upload step itself contributes its extracted
    /// text under `documentContent`. Titles matching no step are stored but
    /// never consulted by validation.
    pub fn update_response(&mut self, title: &str, value: Value) {
        if self
            .config
            .as_ref()
            .is_some_and(|c| c.position_of(title).is_none())
        {
            tracing::debug!(title, "Response recorded for a title with no matching step");
        }

        self.staging.apply(&mut self.staged, title, &value);
        self.responses.insert(title.to_string(), value);
    }

    pub fn response(&self, title: &str) -> Option<&Value> {
        self.responses.get(title)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Whether the step at a 0-based index accepts its current response.
    ///
    /// An index with no step is never valid.
    pub fn is_step_valid(&self, index: usize) -> bool {
        self.step(index)
            .is_some_and(|step| validator::is_step_valid(step, &self.responses))
    }

    /// Whether the step under the cursor accepts its current response.
    pub fn validate_current_step(&self) -> bool {
        self.is_step_valid(self.current_step.saturating_sub(1))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move forward one step without consulting validation. No-op on the
    /// last step.
    pub fn next_step(&mut self) {
        if self.current_step < self.total_steps() {
            self.current_step += 1;
        }
    }

    /// Move back one step. No-op on the first step.
    pub fn prev_step(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Move forward one step only if the current step is valid.
    ///
    /// Returns the new 1-based cursor.
    pub fn advance(&mut self) -> Result<usize, SessionError> {
        let step = self.current().ok_or(SessionError::NoConfig)?;
        if !validator::is_step_valid(step, &self.responses) {
            return Err(SessionError::InvalidStep {
                step: self.current_step,
                title: step.title.clone(),
            });
        }
        if self.is_last_step() {
            return Err(SessionError::AtLastStep);
        }
        self.current_step += 1;
        Ok(self.current_step)
    }

    /// Mark the form complete. Only allowed from a valid last step.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        let step = self.current().ok_or(SessionError::NoConfig)?;
        if !self.is_last_step() {
            return Err(SessionError::NotOnLastStep);
        }
        if !validator::is_step_valid(step, &self.responses) {
            return Err(SessionError::InvalidStep {
                step: self.current_step,
                title: step.title.clone(),
            });
        }
        self.is_submitting = false;
        self.is_form_complete = true;
        tracing::info!(form_id = ?self.form_id, "Form completed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Theme
    // -----------------------------------------------------------------------

    /// Set one color channel of the theme. The hex string is not checked.
    pub fn update_theme_color(&mut self, channel: &str, hex: &str) {
        if let Some(theme) = self.theme_mut() {
            theme.colors.insert(channel.to_string(), hex.to_string());
        }
    }

    /// Set the theme font family. The name is not checked.
    pub fn update_font_family(&mut self, family: &str) {
        if let Some(theme) = self.theme_mut() {
            theme.font_family = Some(family.to_string());
        }
    }

    fn theme_mut(&mut self) -> Option<&mut Theme> {
        self.config.as_mut().map(|c| &mut c.theme)
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Serializable view of the session for renderers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            form_id: self.form_id.clone(),
            current_step: self.current_step,
            total_steps: self.total_steps(),
            current_title: self.current().map(|s| s.title.clone()),
            current_step_valid: self.validate_current_step(),
            responses: self.responses.clone(),
            temp_json: self.staged.clone(),
            is_submitting: self.is_submitting,
            is_form_complete: self.is_form_complete,
            icon_mode: self.icon_mode,
            theme: self.config.as_ref().map(|c| c.theme.clone()),
        }
    }
}

/// Point-in-time view of a [`FormSession`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub form_id: Option<String>,
    pub current_step: usize,
    pub total_steps: usize,
    pub current_title: Option<String>,
    pub current_step_valid: bool,
    pub responses: ResponseMap,
    pub temp_json: ResponseMap,
    pub is_submitting: bool,
    pub is_form_complete: bool,
    pub icon_mode: IconMode,
    pub theme: Option<Theme>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_types::error::StoreError;
    use formcraft_types::form::{StepKind, StepOption, StepValidation};
    use serde_json::json;

    fn tiles(title: &str) -> FormStep {
        FormStep::new(
            title,
            StepKind::Tiles {
                options: vec![StepOption::new("x", "X")],
            },
        )
    }

    fn upload(title: &str) -> FormStep {
        FormStep::new(
            title,
            StepKind::DocumentUpload {
                accept: vec![],
                max_size_mb: None,
            },
        )
    }

    fn info(title: &str) -> FormStep {
        FormStep::new(title, StepKind::DocumentInfo {})
    }

    fn config(steps: Vec<FormStep>) -> FormConfig {
        FormConfig {
            steps,
            ..Default::default()
        }
    }

    fn quote_flow() -> FormConfig {
        config(vec![tiles("Use case"), upload("Upload"), info("Quote")])
    }

    struct StaticStore {
        record: Option<FormRecord>,
    }

    impl FormStore for StaticStore {
        async fn fetch_form(&self, form_id: &str) -> Result<FormRecord, StoreError> {
            match &self.record {
                Some(record) if record.id == form_id => Ok(record.clone()),
                Some(_) => Err(StoreError::NotFound),
                None => Err(StoreError::Connection("offline".to_string())),
            }
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = FormSession::new();
        assert_eq!(session.current_step(), 1);
        assert_eq!(session.total_steps(), 0);
        assert!(session.config().is_none());
        assert!(!session.validate_current_step());
    }

    #[test]
    fn test_set_form_config_resets_everything() {
        let mut session = FormSession::with_config(quote_flow());
        session.update_response("Use case", json!("X"));
        session.next_step();
        session.set_form_id(Some("f-1".to_string()));

        session.set_form_config(config(vec![tiles("Other")]));

        assert_eq!(session.current_step(), 1);
        assert!(session.responses().is_empty());
        assert!(session.staged().is_empty());
        assert!(!session.is_form_complete());
        assert!(session.prompt_history().is_empty());
        assert_eq!(session.total_steps(), 1);
    }

    #[test]
    fn test_orphan_title_is_stored_but_invisible() {
        let mut session = FormSession::with_config(config(vec![tiles("A")]));
        session.update_response("Ghost", json!("boo"));

        assert_eq!(session.response("Ghost"), Some(&json!("boo")));
        assert!(!session.is_step_valid(0));
        assert!(session.staged().is_empty());
    }

    #[test]
    fn test_orphan_title_without_config_does_not_panic() {
        let mut session = FormSession::new();
        session.update_response("Ghost", json!(1));
        assert_eq!(session.responses().len(), 1);
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut session = FormSession::with_config(config(vec![tiles("A"), tiles("B")]));
        session.prev_step();
        assert_eq!(session.current_step(), 1);

        session.next_step();
        assert_eq!(session.current_step(), 2);
        session.next_step();
        session.next_step();
        assert_eq!(session.current_step(), 2);

        session.prev_step();
        assert_eq!(session.current_step(), 1);
    }

    #[test]
    fn test_next_step_ignores_validation() {
        let mut session = FormSession::with_config(config(vec![tiles("A"), tiles("B")]));
        assert!(!session.validate_current_step());
        session.next_step();
        assert_eq!(session.current_step(), 2);
    }

    #[test]
    fn test_advance_refuses_invalid_step() {
        let mut session = FormSession::with_config(config(vec![tiles("A"), tiles("B")]));
        let err = session.advance().unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidStep {
                step: 1,
                title: "A".to_string()
            }
        );
        assert_eq!(session.current_step(), 1);

        session.update_response("A", json!("x"));
        assert_eq!(session.advance(), Ok(2));

        session.update_response("B", json!("y"));
        assert_eq!(session.advance(), Err(SessionError::AtLastStep));
        assert_eq!(session.current_step(), 2);
    }

    #[test]
    fn test_advance_without_config() {
        let mut session = FormSession::new();
        assert_eq!(session.advance(), Err(SessionError::NoConfig));
    }

    #[test]
    fn test_submit_requires_valid_last_step() {
        let mut session = FormSession::with_config(config(vec![tiles("A"), tiles("B")]));
        assert_eq!(session.submit(), Err(SessionError::NotOnLastStep));

        session.next_step();
        assert!(matches!(
            session.submit(),
            Err(SessionError::InvalidStep { step: 2, .. })
        ));

        session.update_response("B", json!("y"));
        session.set_submitting(true);
        assert_eq!(session.submit(), Ok(()));
        assert!(session.is_form_complete());
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_multi_select_validity() {
        let mut session = FormSession::with_config(config(vec![FormStep::new(
            "Pick",
            StepKind::MultiSelect { options: vec![] },
        )]));
        session.update_response("Pick", json!([]));
        assert!(!session.is_step_valid(0));
        session.update_response("Pick", json!(["a"]));
        assert!(session.is_step_valid(0));
    }

    #[test]
    fn test_is_step_valid_out_of_range() {
        let session = FormSession::with_config(config(vec![info("Only")]));
        assert!(session.is_step_valid(0));
        assert!(!session.is_step_valid(1));
    }

    #[test]
    fn test_optional_textbox_is_always_valid() {
        let session = FormSession::with_config(config(vec![FormStep::new(
            "Notes",
            StepKind::Textbox {
                placeholder: None,
                validation: Some(StepValidation {
                    required: Some(false),
                    min_length: Some(20),
                    max_length: None,
                }),
            },
        )]));
        assert!(session.validate_current_step());
    }

    #[test]
    fn test_staged_prefix_rule() {
        let mut session = FormSession::with_config(config(vec![
            tiles("Before"),
            upload("Upload"),
            tiles("After"),
        ]));
        session.update_response("Before", json!("b"));
        session.update_response("After", json!("a"));

        assert_eq!(session.staged().get("Before"), Some(&json!("b")));
        assert!(session.staged().get("After").is_none());
        assert_eq!(session.response("After"), Some(&json!("a")));
    }

    #[test]
    fn test_staged_is_overwritten_on_update() {
        let mut session = FormSession::with_config(quote_flow());
        session.update_response("Use case", json!("X"));
        session.update_response("Use case", json!("Y"));
        assert_eq!(session.staged()["Use case"], "Y");
    }

    #[test]
    fn test_no_upload_step_never_stages() {
        let mut session = FormSession::with_config(config(vec![tiles("A")]));
        session.update_response("A", json!("x"));
        assert!(session.staged().is_empty());
    }

    #[test]
    fn test_quote_flow_scenario() {
        let mut session = FormSession::with_config(quote_flow());

        session.update_response("Use case", json!("X"));
        assert_eq!(session.response("Use case"), Some(&json!("X")));
        assert_eq!(session.staged()["Use case"], "X");
        assert_eq!(session.advance(), Ok(2));

        let upload = json!({"fileName": "brief.pdf", "extractedText": "hello"});
        session.update_response("Upload", upload.clone());
        assert_eq!(session.staged()["Upload"], upload);
        assert_eq!(session.staged()["documentContent"], "hello");
        assert_eq!(session.advance(), Ok(3));

        assert_eq!(session.current().unwrap().title, "Quote");
        assert!(session.validate_current_step());
        assert_eq!(session.staged()["documentContent"], "hello");
        assert_eq!(session.staged()["Use case"], "X");
        assert!(session.staged().get("Quote").is_none());

        session.update_response("Quote", json!({"seen": true}));
        assert!(session.staged().get("Quote").is_none());
    }

    #[test]
    fn test_reset_responses_keeps_config_and_id() {
        let mut session = FormSession::with_config(quote_flow());
        session.set_form_id(Some("f-9".to_string()));
        session.update_response("Use case", json!("X"));
        session.next_step();

        session.reset_responses();

        assert_eq!(session.current_step(), 1);
        assert!(session.responses().is_empty());
        assert!(session.staged().is_empty());
        assert_eq!(session.total_steps(), 3);
        assert_eq!(session.form_id(), Some("f-9"));
    }

    #[test]
    fn test_reset_form_clears_config() {
        let mut session = FormSession::with_config(quote_flow());
        session.update_response("Use case", json!("X"));
        session.reset_form();

        assert!(session.config().is_none());
        assert_eq!(session.total_steps(), 0);
        assert!(session.responses().is_empty());

        // With no config there is no checkpoint left to stage into.
        session.update_response("Use case", json!("X"));
        assert!(session.staged().is_empty());
    }

    #[test]
    fn test_theme_mutators() {
        let mut session = FormSession::with_config(quote_flow());
        session.update_theme_color("primary", "#ff0000");
        session.update_theme_color("primary", "not-a-color");
        session.update_font_family("Comic Sans");

        let theme = &session.config().unwrap().theme;
        assert_eq!(theme.colors["primary"], "not-a-color");
        assert_eq!(theme.font_family.as_deref(), Some("Comic Sans"));

        let mut empty = FormSession::new();
        empty.update_theme_color("primary", "#fff");
        assert!(empty.config().is_none());
    }

    #[test]
    fn test_load_record_sets_metadata() {
        let record = FormRecord {
            id: "f-1".to_string(),
            config: quote_flow(),
            prompt_history: vec![json!({"role": "user", "content": "a quote form"})],
            icon_mode: IconMode::Emojis,
        };
        let session = FormSession::from_record(record);
        assert_eq!(session.form_id(), Some("f-1"));
        assert_eq!(session.prompt_history().len(), 1);
        assert_eq!(session.icon_mode(), IconMode::Emojis);
        assert_eq!(session.total_steps(), 3);
    }

    #[tokio::test]
    async fn test_reset_server_config_replaces_state() {
        let store = StaticStore {
            record: Some(FormRecord {
                id: "f-1".to_string(),
                config: config(vec![tiles("Fresh")]),
                prompt_history: vec![],
                icon_mode: IconMode::Icons,
            }),
        };
        let mut session = FormSession::with_config(quote_flow());
        session.set_form_id(Some("f-1".to_string()));
        session.update_response("Use case", json!("X"));

        session.reset_server_config(&store).await.unwrap();
        assert_eq!(session.total_steps(), 1);
        assert_eq!(session.step(0).unwrap().title, "Fresh");
        assert!(session.responses().is_empty());
        assert_eq!(session.icon_mode(), IconMode::Icons);
    }

    #[tokio::test]
    async fn test_reset_server_config_failure_keeps_stale_state() {
        let store = StaticStore { record: None };
        let mut session = FormSession::with_config(quote_flow());
        session.set_form_id(Some("f-1".to_string()));
        session.update_response("Use case", json!("X"));

        let err = session.reset_server_config(&store).await.unwrap_err();
        assert!(matches!(err, ReloadError::Store(StoreError::Connection(_))));
        assert_eq!(session.total_steps(), 3);
        assert_eq!(session.response("Use case"), Some(&json!("X")));
    }

    #[tokio::test]
    async fn test_reset_server_config_without_form_id() {
        let store = StaticStore { record: None };
        let mut session = FormSession::with_config(quote_flow());
        let err = session.reset_server_config(&store).await.unwrap_err();
        assert!(matches!(err, ReloadError::Session(SessionError::NoFormId)));
        assert_eq!(session.total_steps(), 3);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = FormSession::with_config(quote_flow());
        session.update_response("Use case", json!("X"));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_step, 1);
        assert_eq!(snapshot.total_steps, 3);
        assert_eq!(snapshot.current_title.as_deref(), Some("Use case"));
        assert!(snapshot.current_step_valid);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["tempJson"]["Use case"], "X");
        assert_eq!(json["currentStep"], 1);
    }
}
