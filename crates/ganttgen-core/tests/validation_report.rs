//! Aggregated validation report tests

use chrono::NaiveDate;
use ganttgen_core::{resolve_task_colors, validate, PaletteCycle, Project, Task};
use pretty_assertions::assert_eq;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn every_violation_is_reported_in_order() {
    let mut open_ended = Task::unscheduled("Open ended");
    open_ended.start = Some(date(2025, 1, 6));

    let mut project = Project::new("")
        .task(open_ended)
        .task(Task::new("Backwards", date(2025, 2, 1), date(2025, 1, 20)))
        .task(Task::unscheduled(""));
    project.timeline_start = Some(date(2025, 1, 1));

    let err = validate(&project).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r"
    Validation errors:
      - Missing required field: title
      - Missing required field: timelineEnd
      - Task 1: Missing end date
      - Task 1: Missing color
      - Task 2: Missing color
      - Task 2 (Backwards): start date must be before end date
      - Task 3: Missing name
      - Task 3: Missing start date
      - Task 3: Missing end date
      - Task 3: Missing color
    ");
}

#[test]
fn missing_end_does_not_stop_later_tasks() {
    let mut first = Task::unscheduled("First");
    first.start = Some(date(2025, 1, 6));
    first.color = Some("#F01840".into());

    let project = Project::new("Two tasks")
        .timeline(date(2025, 1, 1), date(2025, 3, 1))
        .task(first)
        .task(Task::new("Second", date(2025, 1, 10), date(2025, 1, 10)).color("#402848"));

    let err = validate(&project).unwrap_err();
    assert_eq!(
        err.errors,
        vec![
            "Task 1: Missing end date".to_string(),
            "Task 2 (Second): start date must be before end date".to_string(),
        ]
    );
}

#[test]
fn resolution_makes_colorless_tasks_valid() {
    let mut project = Project::new("Fallback colors")
        .timeline(date(2025, 1, 1), date(2025, 3, 1))
        .task(Task::new("A", date(2025, 1, 2), date(2025, 1, 9)))
        .task(Task::new("B", date(2025, 1, 10), date(2025, 1, 19)));

    assert!(validate(&project).is_err());
    resolve_task_colors(&mut project, &mut PaletteCycle);
    assert!(validate(&project).is_ok());
}
