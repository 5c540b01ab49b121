//! Workbook export round trip through the tabular decoder

use chrono::NaiveDate;
use ganttgen_core::{Milestone, Project, Renderer, Task};
use ganttgen_parser::Normalizer;
use ganttgen_render::WorkbookWriter;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn create_project() -> Project {
    Project::new("Office Move")
        .timeline(date(2025, 3, 1), date(2025, 6, 30))
        .palette(["#F01840", "#402848", "#C01830"])
        .task(
            Task::new("Survey", date(2025, 3, 3), date(2025, 3, 14))
                .hours(12.5)
                .subtask("Measure rooms")
                .subtask("Inventory furniture")
                .color("#F01840"),
        )
        .task(
            Task::new("Pack", date(2025, 3, 17), date(2025, 4, 11))
                .color("#999999")
                .color_index(2),
        )
        .task(Task::new("Move", date(2025, 4, 14), date(2025, 4, 18)).color("#402848"))
        .milestone(Milestone::new("Keys\nhanded over", date(2025, 4, 18)).on_task(2))
        .milestone(Milestone::new("Party", date(2025, 5, 2)))
        .pause(date(2025, 4, 1), date(2025, 4, 4))
}

#[test]
fn exported_workbook_reimports_identically() {
    let mut project = create_project();
    ganttgen_core::resolve_task_colors(&mut project, &mut ganttgen_core::PaletteCycle);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.xlsx");
    std::fs::write(&path, WorkbookWriter::new().render(&project).unwrap()).unwrap();

    let back = Normalizer::new(StdRng::seed_from_u64(0))
        .parse_file(&path)
        .unwrap();

    assert_eq!(back.title, project.title);
    assert_eq!(back.timeline_start, project.timeline_start);
    assert_eq!(back.timeline_end, project.timeline_end);
    assert_eq!(back.palette, project.palette);
    assert_eq!(back.milestones, project.milestones);
    assert_eq!(back.pause_periods, project.pause_periods);

    let names = |p: &Project| p.task_list().iter().map(|t| t.name.clone()).collect::<Vec<_>>();
    let colors = |p: &Project| p.task_list().iter().map(|t| t.color.clone()).collect::<Vec<_>>();
    assert_eq!(names(&back), names(&project));
    assert_eq!(colors(&back), colors(&project));
    assert_eq!(back.task_list()[0].subtasks, project.task_list()[0].subtasks);
    assert_eq!(back.task_list()[0].hours, Some(12.5));
    assert_eq!(back.task_list()[1].color.as_deref(), Some("#C01830"));
}
