//! Structural and date-ordering checks on a normalized project.
//!
//! Every violation is collected before reporting.

use thiserror::Error;

use crate::{Project, Task};

/// All violations found in one project
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Validation errors:{}", bullet_list(.errors))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

fn bullet_list(errors: &[String]) -> String {
    errors.iter().map(|e| format!("\n  - {}", e)).collect()
}

/// Validate a project, returning every violation at once
pub fn validate(project: &Project) -> Result<(), ValidationError> {
    let errors = collect_violations(project);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

/// List violations in check order
pub fn collect_violations(project: &Project) -> Vec<String> {
    let mut errors = Vec::new();

    if project.title.trim().is_empty() {
        errors.push("Missing required field: title".to_string());
    }
    if project.timeline_start.is_none() {
        errors.push("Missing required field: timelineStart".to_string());
    }
    if project.timeline_end.is_none() {
        errors.push("Missing required field: timelineEnd".to_string());
    }
    if let (Some(start), Some(end)) = (project.timeline_start, project.timeline_end) {
        if start >= end {
            errors.push("timelineStart must be before timelineEnd".to_string());
        }
    }

    match &project.tasks {
        None => errors.push("Missing or invalid tasks array".to_string()),
        Some(tasks) => {
            for (i, task) in tasks.iter().enumerate() {
                check_task(i + 1, task, &mut errors);
            }
        }
    }

    errors
}

fn check_task(number: usize, task: &Task, errors: &mut Vec<String>) {
    let has_name = !task.name.trim().is_empty();
    if !has_name {
        errors.push(format!("Task {}: Missing name", number));
    }
    if task.start.is_none() {
        errors.push(format!("Task {}: Missing start date", number));
    }
    if task.end.is_none() {
        errors.push(format!("Task {}: Missing end date", number));
    }
    if !task.color.as_deref().is_some_and(|c| !c.trim().is_empty()) {
        errors.push(format!("Task {}: Missing color", number));
    }
    if let (Some(start), Some(end)) = (task.start, task.end) {
        if start >= end {
            if has_name {
                errors.push(format!(
                    "Task {} ({}): start date must be before end date",
                    number, task.name
                ));
            } else {
                errors.push(format!("Task {}: start date must be before end date", number));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Task;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn valid_project() -> Project {
        Project::new("Valid")
            .timeline(date(2025, 1, 1), date(2025, 3, 1))
            .task(Task::new("A", date(2025, 1, 2), date(2025, 1, 9)).color("#F01840"))
    }

    #[test]
    fn valid_project_passes() {
        assert!(validate(&valid_project()).is_ok());
    }

    #[test]
    fn empty_task_list_is_valid() {
        let project = Project::new("Empty").timeline(date(2025, 1, 1), date(2025, 2, 1));
        assert!(validate(&project).is_ok());
    }

    #[test]
    fn equal_timeline_dates_fail() {
        let project = Project::new("Same day").timeline(date(2025, 1, 1), date(2025, 1, 1));
        let err = validate(&project).unwrap_err();
        assert_eq!(err.errors, vec!["timelineStart must be before timelineEnd"]);
    }

    #[test]
    fn blank_title_is_missing() {
        let mut project = valid_project();
        project.title = "   ".into();
        let err = validate(&project).unwrap_err();
        assert_eq!(err.errors, vec!["Missing required field: title"]);
    }

    #[test]
    fn missing_tasks_array() {
        let mut project = valid_project();
        project.tasks = None;
        let err = validate(&project).unwrap_err();
        assert_eq!(err.errors, vec!["Missing or invalid tasks array"]);
    }

    #[test]
    fn task_date_order_names_the_task() {
        let project = valid_project()
            .task(Task::new("Backwards", date(2025, 2, 1), date(2025, 1, 1)).color("#000000"));
        let err = validate(&project).unwrap_err();
        assert_eq!(
            err.errors,
            vec!["Task 2 (Backwards): start date must be before end date"]
        );
    }

    #[test]
    fn display_joins_with_bullets() {
        let err = ValidationError {
            errors: vec!["first".into(), "second".into()],
        };
        assert_eq!(err.to_string(), "Validation errors:\n  - first\n  - second");
    }
}
