//! Interactive terminal renderer: `formcraft fill`.
//!
//! Walks the session one step at a time, prompting with `dialoguer` by step
//! type. Forward moves go through the gated `advance`, so an invalid answer
//! re-prompts the same step.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Input, MultiSelect, Select};
use serde_json::{Value, json};

use formcraft_core::session::FormSession;
use formcraft_core::session::shaping::{selection_from, toggle_selection};
use formcraft_core::session::validator::is_valid_email;
use formcraft_core::store::FormStore;
use formcraft_infra::store::{FileFormStore, FormFile, load_form_file};
use formcraft_observe::attrs;
use formcraft_types::error::SessionError;
use formcraft_types::form::{FormStep, StepKind, StepOption};
use formcraft_types::response::{
    ContactResponse, DocumentUploadResponse, FollowupResponse, LocationResponse,
};

use crate::state::AppState;

/// Where the form to fill comes from.
pub enum FormSource {
    File(PathBuf),
    Remote(String),
    Directory { dir: PathBuf, form_id: String },
}

/// Build a session from the chosen source.
pub async fn load_session(state: &AppState, source: &FormSource) -> Result<FormSession> {
    let session = match source {
        FormSource::File(path) => match load_form_file(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?
        {
            FormFile::Record(record) => FormSession::from_record(record),
            FormFile::Config(config) => FormSession::with_config(config),
        },
        FormSource::Remote(form_id) => {
            let record = state
                .form_store
                .fetch_form(form_id)
                .await
                .with_context(|| format!("failed to fetch form '{form_id}'"))?;
            FormSession::from_record(record)
        }
        FormSource::Directory { dir, form_id } => {
            let record = FileFormStore::new(dir.clone())
                .fetch_form(form_id)
                .await
                .with_context(|| {
                    format!("failed to read form '{form_id}' from {}", dir.display())
                })?;
            FormSession::from_record(record)
        }
    };

    if session.total_steps() == 0 {
        bail!("form has no steps");
    }
    Ok(session)
}

/// Fill a form interactively, then print the responses and staged snapshot.
pub async fn fill(state: &AppState, source: FormSource, offline: bool, json: bool) -> Result<()> {
    let mut session = load_session(state, &source).await?;

    loop {
        let step = session
            .current()
            .cloned()
            .context("session has no current step")?;
        print_step_header(&session, &step);

        if let Some(value) = prompt_step(&step, session.response(&step.title)).await? {
            session.update_response(&step.title, value);
        }

        if matches!(step.kind, StepKind::DocumentInfo {}) && !offline {
            show_quotation(state, &session).await;
        }

        let moved = if session.is_last_step() {
            session.submit().map(|_| ())
        } else {
            session.advance().map(|_| ())
        };
        match moved {
            Ok(()) if session.is_form_complete() => break,
            Ok(()) => {}
            Err(SessionError::InvalidStep { title, .. }) if !answerable(&step.kind) => {
                bail!("step '{title}' requires a choice but has no options");
            }
            Err(SessionError::InvalidStep { title, .. }) => {
                println!(
                    "  {} '{}' needs a valid answer before continuing.",
                    style("!").yellow().bold(),
                    title
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(op = attrs::OP_SUBMIT, form_id = ?session.form_id(), "Form filled");
    print_summary(&session, json)
}

/// Choice steps without options offer nothing to pick.
fn answerable(kind: &StepKind) -> bool {
    match kind {
        StepKind::Tiles { .. }
        | StepKind::MultiSelect { .. }
        | StepKind::Followup { .. }
        | StepKind::Dropdown { .. } => !kind.options().is_empty(),
        _ => true,
    }
}

fn print_step_header(session: &FormSession, step: &FormStep) {
    println!();
    println!(
        "  {} {}",
        style(format!("[{}/{}]", session.current_step(), session.total_steps())).dim(),
        style(&step.title).cyan().bold()
    );
    if let Some(subtitle) = &step.subtitle {
        println!("  {}", style(subtitle).dim());
    }
}

/// Prompt for one step. `None` means the step records nothing.
async fn prompt_step(step: &FormStep, existing: Option<&Value>) -> Result<Option<Value>> {
    let value = match &step.kind {
        StepKind::Tiles { options } | StepKind::Dropdown { options, .. } => {
            pick_option(options, existing)?.map(|option| json!(option.id))
        }
        StepKind::MultiSelect { options } if options.is_empty() => None,
        StepKind::MultiSelect { options } => {
            let current = selection_from(existing);
            let checked: Vec<bool> = options.iter().map(|o| current.contains(&o.id)).collect();
            let chosen = MultiSelect::new()
                .with_prompt("Select all that apply (space to toggle)")
                .items(&option_labels(options))
                .defaults(&checked)
                .interact()?;
            Some(json!(apply_choices(&current, options, &chosen)))
        }
        StepKind::Slider {
            min,
            max,
            default_value,
            unit,
            ..
        } => {
            let (min, max) = (*min, *max);
            let initial = existing
                .and_then(Value::as_f64)
                .or(*default_value)
                .unwrap_or(min);
            let prompt = match unit {
                Some(unit) => format!("Value ({min}-{max} {unit})"),
                None => format!("Value ({min}-{max})"),
            };
            let picked: f64 = Input::new()
                .with_prompt(prompt)
                .default(initial)
                .validate_with(move |v: &f64| -> Result<(), String> {
                    if (min..=max).contains(v) {
                        Ok(())
                    } else {
                        Err(format!("must be between {min} and {max}"))
                    }
                })
                .interact_text()?;
            Some(json!(picked))
        }
        StepKind::Followup { options } => match pick_option(options, existing)? {
            Some(option) => {
                let question = option
                    .followup
                    .as_ref()
                    .map(|f| f.question.clone())
                    .unwrap_or_else(|| "Tell us more".to_string());
                let followup: String = Input::new()
                    .with_prompt(question)
                    .allow_empty(true)
                    .interact_text()?;
                Some(serde_json::to_value(FollowupResponse {
                    option: option.id.clone(),
                    followup,
                })?)
            }
            None => None,
        },
        StepKind::Textbox { placeholder, .. } => {
            let text: String = Input::new()
                .with_prompt(placeholder.as_deref().unwrap_or("Your answer"))
                .allow_empty(true)
                .interact_text()?;
            Some(json!(text))
        }
        StepKind::Location { placeholder, .. } => {
            let full_address: String = Input::new()
                .with_prompt(placeholder.as_deref().unwrap_or("Address"))
                .allow_empty(true)
                .interact_text()?;
            let postal_code: String = Input::new()
                .with_prompt("Postal code")
                .allow_empty(true)
                .interact_text()?;
            Some(serde_json::to_value(location_response(full_address, postal_code))?)
        }
        StepKind::Contact { .. } => Some(serde_json::to_value(prompt_contact()?)?),
        StepKind::DocumentUpload { accept, .. } => {
            let hint = if accept.is_empty() {
                "Path to document".to_string()
            } else {
                format!("Path to document ({})", accept.join(", "))
            };
            let path: String = Input::new().with_prompt(hint).interact_text()?;
            match read_document(Path::new(path.trim())).await {
                Ok(upload) => Some(serde_json::to_value(upload)?),
                Err(e) => {
                    println!("  {} {e:#}", style("✗").red());
                    None
                }
            }
        }
        StepKind::DocumentInfo {} => None,
        StepKind::Unknown => {
            println!("  {}", style("This step type is not supported here; skipping.").dim());
            None
        }
    };
    Ok(value)
}

/// Availability is never checked from the terminal, so it stays `false`.
fn location_response(full_address: String, postal_code: String) -> LocationResponse {
    LocationResponse {
        full_address: full_address.trim().to_string(),
        postal_code: postal_code.trim().to_string(),
        is_available: false,
    }
}

fn option_labels(options: &[StepOption]) -> Vec<String> {
    options
        .iter()
        .map(|o| match &o.description {
            Some(desc) => format!("{} - {}", o.title, desc),
            None => o.title.clone(),
        })
        .collect()
}

fn pick_option<'a>(
    options: &'a [StepOption],
    existing: Option<&Value>,
) -> Result<Option<&'a StepOption>> {
    if options.is_empty() {
        return Ok(None);
    }
    let current = existing
        .and_then(Value::as_str)
        .and_then(|id| options.iter().position(|o| o.id == id))
        .unwrap_or(0);
    let index = Select::new()
        .with_prompt("Choose one")
        .items(&option_labels(options))
        .default(current)
        .interact()?;
    Ok(options.get(index))
}

/// Turn the checked rows of a multi-select prompt into a selection,
/// toggling only the options whose state changed so existing order is kept.
fn apply_choices(current: &[String], options: &[StepOption], chosen: &[usize]) -> Vec<String> {
    let mut selection = current.to_vec();
    for (index, option) in options.iter().enumerate() {
        if chosen.contains(&index) != selection.contains(&option.id) {
            selection = toggle_selection(&selection, &option.id);
        }
    }
    selection
}

fn prompt_contact() -> Result<ContactResponse> {
    let first_name: String = Input::new()
        .with_prompt("First name")
        .allow_empty(true)
        .interact_text()?;
    let last_name: String = Input::new()
        .with_prompt("Last name")
        .allow_empty(true)
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("Email")
        .allow_empty(true)
        .validate_with(|e: &String| -> Result<(), &str> {
            if e.is_empty() || is_valid_email(e) {
                Ok(())
            } else {
                Err("not a valid email address")
            }
        })
        .interact_text()?;
    let phone: String = Input::new()
        .with_prompt("Phone")
        .allow_empty(true)
        .interact_text()?;

    let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);
    Ok(ContactResponse {
        first_name: non_empty(first_name),
        last_name: non_empty(last_name),
        email: non_empty(email),
        phone: non_empty(phone),
    })
}

/// Read a local file as an uploaded document. Its text becomes the
/// extracted text.
async fn read_document(path: &Path) -> Result<DocumentUploadResponse> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(DocumentUploadResponse {
        mime_type: mime_for(path).map(str::to_string),
        file_name,
        file_size: Some(bytes.len() as u64),
        extracted_text: (!text.trim().is_empty()).then_some(text),
        document_content: None,
    })
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        "pdf" => Some("application/pdf"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        _ => None,
    }
}

async fn show_quotation(state: &AppState, session: &FormSession) {
    match state.quotation_service.quote(session).await {
        Ok(quotation) => {
            println!();
            println!("  {}", style("── Quotation ──").dim());
            for line in quotation.body().lines() {
                println!("  {line}");
            }
        }
        Err(e) => {
            println!("  {} Quotation unavailable: {e}", style("!").yellow());
        }
    }
}

fn print_summary(session: &FormSession, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        return Ok(());
    }

    println!();
    println!("  {} Form complete", style("✓").green().bold());
    println!();
    println!("  {}", style("── Responses ──").dim());
    for (title, value) in session.responses() {
        println!("  {}: {}", style(title).bold(), value);
    }
    if !session.staged().is_empty() {
        println!();
        println!("  {}", style("── Staged ──").dim());
        for (key, value) in session.staged() {
            println!("  {}: {}", style(key).bold(), value);
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::test_support::offline_state;
    use tempfile::TempDir;

    fn options() -> Vec<StepOption> {
        vec![
            StepOption::new("a", "A"),
            StepOption::new("b", "B"),
            StepOption::new("c", "C"),
        ]
    }

    #[test]
    fn test_apply_choices_keeps_existing_order() {
        let current = vec!["c".to_string(), "a".to_string()];
        let selection = apply_choices(&current, &options(), &[0, 1, 2]);
        assert_eq!(selection, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_apply_choices_removes_unchecked() {
        let current = vec!["a".to_string(), "b".to_string()];
        let selection = apply_choices(&current, &options(), &[1]);
        assert_eq!(selection, vec!["b"]);
    }

    #[test]
    fn test_location_response_does_not_claim_availability() {
        let location = location_response(" 1 Main St ".to_string(), "12345 ".to_string());
        assert_eq!(location.full_address, "1 Main St");
        assert_eq!(location.postal_code, "12345");
        assert!(!location.is_available);
    }

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for(Path::new("plan.PDF")), Some("application/pdf"));
        assert_eq!(mime_for(Path::new("notes.txt")), Some("text/plain"));
        assert_eq!(mime_for(Path::new("archive.tar.gz")), None);
        assert_eq!(mime_for(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_read_document_extracts_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scope.txt");
        tokio::fs::write(&path, "replace 12 windows").await.unwrap();

        let upload = read_document(&path).await.unwrap();
        assert_eq!(upload.file_name, "scope.txt");
        assert_eq!(upload.file_size, Some(18));
        assert_eq!(upload.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(upload.extracted_text.as_deref(), Some("replace 12 windows"));
    }

    #[tokio::test]
    async fn test_read_document_missing_file() {
        assert!(read_document(Path::new("/nonexistent/scope.txt")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_session_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.json");
        tokio::fs::write(
            &path,
            r#"{"theme": {}, "steps": [{"type": "textbox", "title": "Notes"}]}"#,
        )
        .await
        .unwrap();

        let session = load_session(&offline_state(), &FormSource::File(path))
            .await
            .unwrap();
        assert_eq!(session.total_steps(), 1);
        assert!(session.form_id().is_none());
    }

    #[tokio::test]
    async fn test_load_session_from_directory() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("f-9.json"),
            r#"{"id": "f-9", "config": {"theme": {}, "steps": [{"type": "slider", "title": "Size"}]}}"#,
        )
        .await
        .unwrap();

        let source = FormSource::Directory {
            dir: tmp.path().to_path_buf(),
            form_id: "f-9".to_string(),
        };
        let session = load_session(&offline_state(), &source).await.unwrap();
        assert_eq!(session.form_id(), Some("f-9"));
    }

    #[test]
    fn test_answerable_needs_options_for_choice_steps() {
        assert!(!answerable(&StepKind::Tiles { options: vec![] }));
        assert!(!answerable(&StepKind::Followup { options: vec![] }));
        assert!(answerable(&StepKind::Tiles { options: options() }));
        assert!(answerable(&StepKind::DocumentInfo {}));
    }

    #[tokio::test]
    async fn test_fill_stops_on_choice_step_without_options() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("form.json");
        tokio::fs::write(
            &path,
            r#"{"theme": {}, "steps": [{"type": "tiles", "title": "Use case", "options": []}]}"#,
        )
        .await
        .unwrap();

        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(3),
            fill(&offline_state(), FormSource::File(path), true, false),
        )
        .await
        .expect("fill returned");
        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("no options"));
    }

    #[tokio::test]
    async fn test_load_session_rejects_empty_form() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        tokio::fs::write(&path, r#"{"theme": {}, "steps": []}"#).await.unwrap();

        let err = load_session(&offline_state(), &FormSource::File(path))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }
}
