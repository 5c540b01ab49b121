//! Tabular workbook decoding.
//!
//! Sheets and columns are positional; row 1 of every sheet is a header.
//!
//! | Sheet | Columns |
//! |-------|---------|
//! | Project | A title, B timelineStart, C timelineEnd, D showMilestones (row 2 only) |
//! | Tasks | A name, B start, C end, D hours, E..N subtasks, O color, P colorIndex |
//! | Milestones | A name, B date, C linked task name |
//! | PausePeriods | A start, B end |
//! | Palette | A color |

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use ganttgen_core::{
    parse_calendar_date, Milestone, PausePeriod, Project, Task, DEFAULT_TITLE, MAX_SUBTASKS,
};
use tracing::{debug, warn};

use crate::lenient::{
    date_from_serial, flag_from_text, hours_from_f64, hours_from_text, index_from_f64,
    index_from_text, milestone_label,
};
use crate::ParseError;

const FIRST_SUBTASK_COL: u32 = 4;
const COLOR_COL: u32 = 14;
const COLOR_INDEX_COL: u32 = 15;

/// Read a workbook file into a project (colors not yet resolved)
pub fn decode(path: &Path, warnings: &mut Vec<String>) -> Result<Project, ParseError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ParseError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let names = workbook.sheet_names();

    let mut sheet = |name: &str| -> Result<Option<Range<Data>>, ParseError> {
        if !names.iter().any(|n| n == name) {
            debug!(sheet = name, "Sheet not present");
            return Ok(None);
        }
        workbook
            .worksheet_range(name)
            .map(Some)
            .map_err(|e| ParseError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet {}: {}", name, e),
            })
    };

    let project_sheet = sheet("Project")?;
    let palette_sheet = sheet("Palette")?;
    let tasks_sheet = sheet("Tasks")?;
    let milestones_sheet = sheet("Milestones")?;
    let pause_sheet = sheet("PausePeriods")?;

    let mut project = Project::new("");

    if let Some(range) = &project_sheet {
        project.title = text(range, 1, 0).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        project.timeline_start = date(range, 1, 1, path, "Project!B2")?;
        project.timeline_end = date(range, 1, 2, path, "Project!C2")?;
        project.show_milestones = flag(range, 1, 3).unwrap_or(true);
    }

    project.palette = match &palette_sheet {
        Some(range) => data_rows(range)
            .filter_map(|row| text(range, row, 0))
            .collect(),
        None => Vec::new(),
    };

    let mut tasks = Vec::new();
    if let Some(range) = &tasks_sheet {
        for row in data_rows(range) {
            let Some(name) = text(range, row, 0) else {
                continue;
            };
            let at = |col: char| format!("Tasks!{}{}", col, row + 1);

            let mut task = Task::unscheduled(name);
            task.start = date(range, row, 1, path, &at('B'))?;
            task.end = date(range, row, 2, path, &at('C'))?;
            task.hours = Some(hours(range, row, 3).unwrap_or(0.0));
            task.subtasks = (FIRST_SUBTASK_COL..FIRST_SUBTASK_COL + MAX_SUBTASKS as u32)
                .filter_map(|col| text(range, row, col))
                .collect();
            task.declared_color = text(range, row, COLOR_COL);
            task.color.clone_from(&task.declared_color);
            task.color_index = index(range, row, COLOR_INDEX_COL);
            tasks.push(task);
        }
    }
    project.tasks = Some(tasks);

    if let Some(range) = &milestones_sheet {
        for row in data_rows(range) {
            let Some(raw_name) = text(range, row, 0) else {
                continue;
            };
            let name = milestone_label(&raw_name);
            let Some(when) = date(range, row, 1, path, &format!("Milestones!B{}", row + 1))? else {
                let message = format!("Milestone '{}' has no date and was dropped", raw_name);
                warn!("{}", message);
                warnings.push(message);
                continue;
            };

            let mut milestone = Milestone::new(name, when);
            if let Some(linked) = text(range, row, 2) {
                milestone.task_index = project.task_index_by_name(&linked);
                if milestone.task_index.is_none() {
                    let message = format!(
                        "Milestone '{}' links to unknown task '{}'",
                        raw_name, linked
                    );
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
            project.milestones.push(milestone);
        }
    }

    if let Some(range) = &pause_sheet {
        for row in data_rows(range) {
            let start = date(range, row, 0, path, &format!("PausePeriods!A{}", row + 1))?;
            let end = date(range, row, 1, path, &format!("PausePeriods!B{}", row + 1))?;
            if let (Some(start), Some(end)) = (start, end) {
                project.pause_periods.push(PausePeriod { start, end });
            }
        }
    }

    Ok(project)
}

/// Absolute row numbers after the header row
fn data_rows(range: &Range<Data>) -> impl Iterator<Item = u32> {
    let last = range.end().map_or(0, |(row, _)| row);
    1..=last
}

// ============================================================================
// Cell readers
// ============================================================================

static EMPTY: Data = Data::Empty;

fn cell(range: &Range<Data>, row: u32, col: u32) -> &Data {
    range.get_value((row, col)).unwrap_or(&EMPTY)
}

/// Trimmed, non-empty text; integral numbers are written without `.0`
fn text(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    let text = match cell(range, row, col) {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}

fn date(
    range: &Range<Data>,
    row: u32,
    col: u32,
    path: &Path,
    cell_ref: &str,
) -> Result<Option<NaiveDate>, ParseError> {
    let value = cell(range, row, col);
    let parsed = match value {
        Data::Empty => return Ok(None),
        Data::String(s) if s.trim().is_empty() => return Ok(None),
        Data::String(s) | Data::DateTimeIso(s) => parse_calendar_date(s),
        Data::DateTime(dt) => date_from_serial(dt.as_f64()),
        Data::Float(f) => date_from_serial(*f),
        Data::Int(i) => date_from_serial(*i as f64),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| ParseError::invalid(path, format!("{} is not a date: {}", cell_ref, value)))
}

fn hours(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match cell(range, row, col) {
        Data::Float(f) => hours_from_f64(*f),
        Data::Int(i) => hours_from_f64(*i as f64),
        Data::String(s) => hours_from_text(s),
        _ => None,
    }
}

fn index(range: &Range<Data>, row: u32, col: u32) -> Option<usize> {
    match cell(range, row, col) {
        Data::Float(f) => index_from_f64(*f),
        Data::Int(i) => usize::try_from(*i).ok(),
        Data::String(s) => index_from_text(s),
        _ => None,
    }
}

fn flag(range: &Range<Data>, row: u32, col: u32) -> Option<bool> {
    match cell(range, row, col) {
        Data::Bool(b) => Some(*b),
        Data::Float(f) => Some(*f != 0.0),
        Data::Int(i) => Some(*i != 0),
        Data::String(s) => flag_from_text(s),
        _ => None,
    }
}
