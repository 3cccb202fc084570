//! `formcraft check`: step table and structural warnings for a form file.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use formcraft_core::session::staging::{Staging, StagingPlan};
use formcraft_infra::store::{FormFile, load_form_file};
use formcraft_types::form::{FormConfig, StepKind, StepType};

#[derive(Debug, Serialize)]
pub struct StepRow {
    /// 1-based, as shown to users.
    pub number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub step_type: String,
    pub optional: bool,
    pub options: usize,
    pub staging: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub steps: Vec<StepRow>,
    pub warnings: Vec<String>,
}

/// Describe each step and collect warnings about the config's structure.
pub fn inspect(config: &FormConfig) -> CheckReport {
    let plan = StagingPlan::for_config(config);

    let steps = config
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let staging = if config.position_of(&step.title) != Some(index) {
                "shadowed"
            } else {
                match plan.classify(&step.title) {
                    Staging::Skip => "-",
                    Staging::Collect => "staged",
                    Staging::Checkpoint => "checkpoint",
                }
            };
            StepRow {
                number: index + 1,
                id: step.id.clone(),
                title: step.title.clone(),
                step_type: step.step_type().to_string(),
                optional: step.kind.validation().is_some_and(|v| v.is_optional()),
                options: step.kind.options().len(),
                staging,
            }
        })
        .collect();

    let mut warnings = Vec::new();
    if config.steps.is_empty() {
        warnings.push("Form has no steps".to_string());
    }
    for title in config.duplicate_titles() {
        warnings.push(format!(
            "Title '{title}' is used by more than one step; they share one response"
        ));
    }
    let mut seen_ids = HashSet::new();
    for step in &config.steps {
        if let Some(id) = &step.id {
            if !seen_ids.insert(id.as_str()) {
                warnings.push(format!("Step id '{id}' is used by more than one step"));
            }
        }
    }
    for (index, step) in config.steps.iter().enumerate() {
        let needs_options = matches!(
            step.kind,
            StepKind::Tiles { .. }
                | StepKind::MultiSelect { .. }
                | StepKind::Followup { .. }
                | StepKind::Dropdown { .. }
        );
        if needs_options && step.kind.options().is_empty() {
            warnings.push(format!("Step {} ('{}') has no options", index + 1, step.title));
        }
        if matches!(step.kind, StepKind::Unknown) {
            warnings.push(format!(
                "Step {} ('{}') has an unsupported type and is always valid",
                index + 1,
                step.title
            ));
        }
    }
    match plan.checkpoint() {
        Some(checkpoint) => {
            let after = config.steps.len() - checkpoint - 1;
            let informational = config.steps[checkpoint + 1..]
                .iter()
                .filter(|s| s.step_type() == StepType::DocumentInfo)
                .count();
            if after > informational {
                warnings.push(format!(
                    "{} step(s) after '{}' are not included in the quotation snapshot",
                    after - informational,
                    config.steps[checkpoint].title
                ));
            }
        }
        None => {
            if config.steps.iter().any(|s| s.step_type() == StepType::DocumentInfo) {
                warnings.push(
                    "documentInfo step present without a documentUpload step; \
                     quotations will have nothing to price"
                        .to_string(),
                );
            }
        }
    }

    CheckReport { steps, warnings }
}

pub async fn check(path: &Path, json: bool) -> Result<()> {
    let config = match load_form_file(path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))?
    {
        FormFile::Record(record) => record.config,
        FormFile::Config(config) => config,
    };
    let report = inspect(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} ({} steps)",
        style(path.display()).cyan().bold(),
        report.steps.len()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Optional").fg(Color::White),
        Cell::new("Options").fg(Color::White),
        Cell::new("Staging").fg(Color::White),
    ]);

    for row in &report.steps {
        let staging_color = match row.staging {
            "checkpoint" => Color::Green,
            "staged" => Color::Cyan,
            "shadowed" => Color::Yellow,
            _ => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(row.number),
            Cell::new(row.id.as_deref().unwrap_or("")).fg(Color::DarkGrey),
            Cell::new(&row.title).fg(Color::Cyan),
            Cell::new(&row.step_type),
            Cell::new(if row.optional { "yes" } else { "" }),
            Cell::new(if row.options > 0 {
                row.options.to_string()
            } else {
                String::new()
            }),
            Cell::new(row.staging).fg(staging_color),
        ]);
    }

    println!("{table}");
    println!();

    if report.warnings.is_empty() {
        println!("  {} No problems found", style("✓").green());
    } else {
        for warning in &report.warnings {
            println!("  {} {warning}", style("!").yellow().bold());
        }
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> FormConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_clean_quote_form_has_no_warnings() {
        let report = inspect(&config(
            r#"{"theme": {}, "steps": [
                {"type": "tiles", "title": "Service", "options": [{"id": "a", "title": "A"}]},
                {"type": "documentUpload", "title": "Upload"},
                {"type": "documentInfo", "title": "Quote"}
            ]}"#,
        ));

        let staging: Vec<_> = report.steps.iter().map(|r| r.staging).collect();
        assert_eq!(staging, vec!["staged", "checkpoint", "-"]);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_duplicate_titles_are_shadowed() {
        let report = inspect(&config(
            r#"{"theme": {}, "steps": [
                {"type": "textbox", "title": "Notes"},
                {"type": "textbox", "title": "Notes"}
            ]}"#,
        ));

        assert_eq!(report.steps[1].staging, "shadowed");
        assert!(report.warnings.iter().any(|w| w.contains("'Notes'")));
    }

    #[test]
    fn test_duplicate_step_ids_warned() {
        let report = inspect(&config(
            r#"{"theme": {}, "steps": [
                {"id": "s1", "type": "slider", "title": "Width"},
                {"id": "s1", "type": "slider", "title": "Height"}
            ]}"#,
        ));

        assert_eq!(report.steps[0].id.as_deref(), Some("s1"));
        assert_eq!(
            report.warnings,
            vec!["Step id 's1' is used by more than one step".to_string()]
        );
    }

    #[test]
    fn test_steps_after_checkpoint_warned() {
        let report = inspect(&config(
            r#"{"theme": {}, "steps": [
                {"type": "documentUpload", "title": "Upload"},
                {"type": "contact", "title": "Contact"},
                {"type": "documentInfo", "title": "Quote"}
            ]}"#,
        ));

        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.starts_with("1 step(s) after 'Upload'"))
        );
    }

    #[test]
    fn test_structural_warnings() {
        let report = inspect(&config(
            r#"{"theme": {}, "steps": [
                {"type": "dropdown", "title": "Size", "validation": {"required": false}},
                {"type": "carousel", "title": "Gallery"},
                {"type": "documentInfo", "title": "Quote"}
            ]}"#,
        ));

        assert!(report.steps[0].optional);
        assert_eq!(report.steps[1].step_type, "unknown");
        assert_eq!(report.warnings.len(), 3, "{:?}", report.warnings);
    }

    #[test]
    fn test_empty_form() {
        let report = inspect(&FormConfig::default());
        assert!(report.steps.is_empty());
        assert_eq!(report.warnings, vec!["Form has no steps".to_string()]);
    }
}
