//! Declarative document decoding.
//!
//! The document mirrors the serialized `Project` shape. Missing required
//! fields are left empty for the validator to report; values of the wrong
//! type for optional fields are ignored. Dates that are present but
//! unreadable are rejected.

use std::path::Path;

use chrono::NaiveDate;
use ganttgen_core::{
    parse_calendar_date, Color, Milestone, PausePeriod, Project, Task, MAX_SUBTASKS,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::lenient::{flag_from_text, hours_from_f64, hours_from_text, index_from_f64, index_from_text};
use crate::ParseError;

type Object = Map<String, Value>;

/// Decode a parsed JSON value into a project (colors not yet resolved)
pub fn decode(
    value: &Value,
    source: &Path,
    warnings: &mut Vec<String>,
) -> Result<Project, ParseError> {
    let root = value
        .as_object()
        .ok_or_else(|| ParseError::invalid(source, "top-level value must be an object"))?;

    let mut project = Project::new(string_field(root, "title").unwrap_or_default());
    project.timeline_start = date_field(root, "timelineStart", source, "timelineStart")?;
    project.timeline_end = date_field(root, "timelineEnd", source, "timelineEnd")?;
    project.show_milestones = root.get("showMilestones").and_then(flag).unwrap_or(true);
    project.palette = palette(root);
    project.palette_preset = non_blank(root, "palettePreset");
    project.accent_border = non_blank(root, "accentBorder");
    project.accent_color = non_blank(root, "accentColor");

    project.tasks = match root.get("tasks") {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| task(item, i + 1, source))
                .collect::<Result<_, _>>()?,
        ),
        _ => None,
    };

    if let Some(Value::Array(items)) = root.get("milestones") {
        for (i, item) in items.iter().enumerate() {
            if let Some(m) = milestone(item, i + 1, source, warnings)? {
                project.milestones.push(m);
            }
        }
    }

    if let Some(Value::Array(items)) = root.get("pausePeriods") {
        for (i, item) in items.iter().enumerate() {
            let Some(obj) = item.as_object() else { continue };
            let context = format!("pause period {}", i + 1);
            let start = date_field(obj, "start", source, &context)?;
            let end = date_field(obj, "end", source, &context)?;
            match (start, end) {
                (Some(start), Some(end)) => project.pause_periods.push(PausePeriod { start, end }),
                _ => debug!(index = i + 1, "Skipping incomplete pause period"),
            }
        }
    }

    Ok(project)
}

fn task(item: &Value, number: usize, source: &Path) -> Result<Task, ParseError> {
    let Some(obj) = item.as_object() else {
        return Ok(Task::unscheduled(""));
    };
    let context = format!("task {}", number);

    let mut task = Task::unscheduled(string_field(obj, "name").unwrap_or_default());
    task.start = date_field(obj, "start", source, &context)?;
    task.end = date_field(obj, "end", source, &context)?;
    task.hours = obj.get("hours").and_then(hours);
    task.subtasks = subtasks(obj);
    task.declared_color = non_blank(obj, "color");
    task.color.clone_from(&task.declared_color);
    task.color_index = obj.get("colorIndex").and_then(index);
    Ok(task)
}

fn milestone(
    item: &Value,
    number: usize,
    source: &Path,
    warnings: &mut Vec<String>,
) -> Result<Option<Milestone>, ParseError> {
    let Some(obj) = item.as_object() else {
        return Ok(None);
    };
    let name = string_field(obj, "name").unwrap_or_default();
    let context = format!("milestone {}", number);

    let Some(date) = date_field(obj, "date", source, &context)? else {
        let message = format!("Milestone {} ({}) has no date and was dropped", number, name);
        warn!("{}", message);
        warnings.push(message);
        return Ok(None);
    };

    Ok(Some(Milestone {
        name,
        date,
        task_index: obj.get("taskIndex").and_then(index),
    }))
}

// ============================================================================
// Field helpers
// ============================================================================

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_blank(obj: &Object, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Absent, null and blank dates are `None`; anything else must parse
fn date_field(
    obj: &Object,
    key: &str,
    source: &Path,
    context: &str,
) -> Result<Option<NaiveDate>, ParseError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => parse_calendar_date(text).map(Some).ok_or_else(|| {
            ParseError::invalid(source, format!("{} has an invalid {} date '{}'", context, key, text))
        }),
        Some(other) => Err(ParseError::invalid(
            source,
            format!("{} has a non-text {} date: {}", context, key, other),
        )),
    }
}

fn palette(obj: &Object) -> Vec<Color> {
    match obj.get("palette") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn subtasks(obj: &Object) -> Vec<String> {
    match obj.get("subtasks") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(MAX_SUBTASKS)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize).or_else(|| n.as_f64().and_then(index_from_f64)),
        Value::String(s) => index_from_text(s),
        _ => None,
    }
}

fn hours(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(hours_from_f64),
        Value::String(s) => hours_from_text(s),
        _ => None,
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => flag_from_text(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_ok(value: &Value) -> (Project, Vec<String>) {
        let mut warnings = Vec::new();
        let project = decode(value, Path::new("test.json"), &mut warnings).unwrap();
        (project, warnings)
    }

    #[test]
    fn lenient_numbers() {
        let (project, _) = decode_ok(&json!({
            "tasks": [
                { "name": "a", "hours": "12", "colorIndex": "2" },
                { "name": "b", "hours": 3.5, "colorIndex": 1.0 },
                { "name": "c", "hours": "n/a", "colorIndex": -1 }
            ]
        }));
        let tasks = project.task_list();
        assert_eq!(tasks[0].hours, Some(12.0));
        assert_eq!(tasks[0].color_index, Some(2));
        assert_eq!(tasks[1].hours, Some(3.5));
        assert_eq!(tasks[1].color_index, Some(1));
        assert_eq!(tasks[2].hours, None);
        assert_eq!(tasks[2].color_index, None);
    }

    #[test]
    fn missing_fields_are_left_for_validation() {
        let (project, _) = decode_ok(&json!({ "tasks": "nope" }));
        assert_eq!(project.title, "");
        assert!(project.timeline_start.is_none());
        assert!(project.tasks.is_none());
        assert!(project.palette.is_empty());
        assert!(project.show_milestones);
    }

    #[test]
    fn invalid_date_is_rejected() {
        let mut warnings = Vec::new();
        let err = decode(
            &json!({ "tasks": [{ "name": "a", "start": "next week" }] }),
            Path::new("plan.json"),
            &mut warnings,
        )
        .unwrap_err();
        assert!(err.to_string().contains("task 1 has an invalid start date 'next week'"));
        assert!(err.to_string().contains("plan.json"));
    }

    #[test]
    fn undated_milestone_is_dropped() {
        let (project, warnings) = decode_ok(&json!({
            "milestones": [
                { "name": "Kickoff", "date": "2025-01-06", "taskIndex": 0 },
                { "name": "Someday" }
            ]
        }));
        assert_eq!(project.milestones.len(), 1);
        assert_eq!(project.milestones[0].task_index, Some(0));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Someday"));
    }

    #[test]
    fn subtasks_are_capped() {
        let many: Vec<String> = (1..=12).map(|i| format!("step {}", i)).collect();
        let (project, _) = decode_ok(&json!({ "tasks": [{ "name": "a", "subtasks": many }] }));
        let subtasks = &project.task_list()[0].subtasks;
        assert_eq!(subtasks.len(), MAX_SUBTASKS);
        assert_eq!(subtasks[9], "step 10");
    }

    #[test]
    fn incomplete_pause_periods_are_skipped() {
        let (project, _) = decode_ok(&json!({
            "pausePeriods": [
                { "start": "2025-02-10", "end": "2025-02-12" },
                { "start": "2025-03-01" }
            ]
        }));
        assert_eq!(project.pause_periods.len(), 1);
    }

    #[test]
    fn declared_preset_and_accents() {
        let (project, _) = decode_ok(&json!({
            "palettePreset": "reds",
            "accentBorder": "#111111",
            "showMilestones": "no"
        }));
        assert_eq!(project.palette_preset.as_deref(), Some("reds"));
        assert_eq!(project.accent_border.as_deref(), Some("#111111"));
        assert!(!project.show_milestones);
    }
}
