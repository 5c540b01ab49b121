//! Workbook export
//!
//! Writes a project back into the tabular input layout so it can be edited
//! in a spreadsheet and converted again.
//!
//! ## Sheet Structure
//!
//! | Sheet | Columns |
//! |-------|---------|
//! | Instructions | free text |
//! | Palette | color |
//! | Project | title, timelineStart, timelineEnd, showMilestones |
//! | Tasks | name, start, end, hours, subtask1..subtask10, color, colorIndex |
//! | Milestones | name, date, linkedTask |
//! | PausePeriods | start, end |

use chrono::NaiveDate;
use ganttgen_core::{presets, Project, RenderError, Renderer, DEFAULT_TITLE, MAX_SUBTASKS};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const TASK_HEADERS: [&str; 16] = [
    "name",
    "start",
    "end",
    "hours",
    "subtask1",
    "subtask2",
    "subtask3",
    "subtask4",
    "subtask5",
    "subtask6",
    "subtask7",
    "subtask8",
    "subtask9",
    "subtask10",
    "color",
    "colorIndex",
];

/// Renders a project as an editable input workbook
#[derive(Clone, Debug)]
pub struct WorkbookWriter {
    /// Whether to include the Instructions sheet
    pub include_instructions: bool,
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self {
            include_instructions: true,
        }
    }
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit the Instructions sheet
    pub fn no_instructions(mut self) -> Self {
        self.include_instructions = false;
        self
    }

    /// Generate workbook bytes
    pub fn render_to_bytes(&self, project: &Project) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        if self.include_instructions {
            self.add_instructions_sheet(&mut workbook, &header)?;
        }
        self.add_palette_sheet(&mut workbook, project, &header)?;
        self.add_project_sheet(&mut workbook, project, &header)?;
        self.add_tasks_sheet(&mut workbook, project, &header)?;
        self.add_milestones_sheet(&mut workbook, project, &header)?;
        self.add_pause_sheet(&mut workbook, project, &header)?;

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create workbook: {e}")))
    }

    fn add_instructions_sheet(
        &self,
        workbook: &mut Workbook,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "Instructions")?;
        sheet
            .write_with_format(0, 0, "GanttGen workbook - instructions", header)
            .map_err(xlsx_err)?;

        let mut lines = vec![
            String::new(),
            "1. Set the title and timeline dates on the Project sheet".to_string(),
            "2. Add one row per task on the Tasks sheet".to_string(),
            "3. Add milestones on the Milestones sheet (optional)".to_string(),
            "4. Add pause periods on the PausePeriods sheet (optional)".to_string(),
            "5. Run: ganttgen convert --input <this file> --palette <preset>".to_string(),
            String::new(),
            "Dates use YYYY-MM-DD (e.g. 2025-01-15)".to_string(),
            "colorIndex refers to the Palette sheet, counting from 0".to_string(),
            "Write \\n in a milestone name for a line break".to_string(),
            "The linkedTask column must match a task name exactly".to_string(),
            String::new(),
            "Palette presets:".to_string(),
        ];
        lines.extend(
            presets()
                .iter()
                .map(|p| format!("  {} - {}", p.id, p.description)),
        );

        for (i, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                sheet.write(i as u32 + 1, 0, line.as_str()).map_err(xlsx_err)?;
            }
        }
        sheet.set_column_width(0, 70).ok();
        Ok(())
    }

    fn add_palette_sheet(
        &self,
        workbook: &mut Workbook,
        project: &Project,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "Palette")?;
        write_header(sheet, &["color"], header)?;
        for (i, color) in project.palette.iter().enumerate() {
            sheet.write(i as u32 + 1, 0, color.as_str()).map_err(xlsx_err)?;
        }
        sheet.set_column_width(0, 20).ok();
        Ok(())
    }

    fn add_project_sheet(
        &self,
        workbook: &mut Workbook,
        project: &Project,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "Project")?;
        write_header(
            sheet,
            &["title", "timelineStart", "timelineEnd", "showMilestones"],
            header,
        )?;

        let title = if project.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            project.title.as_str()
        };
        sheet.write(1, 0, title).map_err(xlsx_err)?;
        write_date(sheet, 1, 1, project.timeline_start)?;
        write_date(sheet, 1, 2, project.timeline_end)?;
        sheet
            .write_boolean(1, 3, project.show_milestones)
            .map_err(xlsx_err)?;

        sheet.set_column_width(0, 30).ok();
        for col in 1..=3 {
            sheet.set_column_width(col, 18).ok();
        }
        Ok(())
    }

    fn add_tasks_sheet(
        &self,
        workbook: &mut Workbook,
        project: &Project,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "Tasks")?;
        write_header(sheet, &TASK_HEADERS, header)?;

        for (i, task) in project.task_list().iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write(row, 0, task.name.as_str()).map_err(xlsx_err)?;
            write_date(sheet, row, 1, task.start)?;
            write_date(sheet, row, 2, task.end)?;
            sheet
                .write_number(row, 3, task.hours.unwrap_or(0.0))
                .map_err(xlsx_err)?;
            for (j, subtask) in task.subtasks.iter().take(MAX_SUBTASKS).enumerate() {
                sheet
                    .write(row, 4 + j as u16, subtask.as_str())
                    .map_err(xlsx_err)?;
            }
            if let Some(color) = &task.color {
                sheet.write(row, 14, color.as_str()).map_err(xlsx_err)?;
            }
            if let Some(index) = task.color_index {
                sheet.write_number(row, 15, index as f64).map_err(xlsx_err)?;
            }
        }

        sheet.set_column_width(0, 35).ok();
        sheet.set_column_width(1, 14).ok();
        sheet.set_column_width(2, 14).ok();
        sheet.set_column_width(3, 8).ok();
        for col in 4..14 {
            sheet.set_column_width(col, 30).ok();
        }
        sheet.set_column_width(14, 12).ok();
        sheet.set_column_width(15, 12).ok();
        sheet.set_freeze_panes(1, 0).ok();
        Ok(())
    }

    fn add_milestones_sheet(
        &self,
        workbook: &mut Workbook,
        project: &Project,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "Milestones")?;
        write_header(sheet, &["name", "date", "linkedTask"], header)?;

        let tasks = project.task_list();
        for (i, milestone) in project.milestones.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write(row, 0, milestone.name.as_str()).map_err(xlsx_err)?;
            write_date(sheet, row, 1, Some(milestone.date))?;
            if let Some(task) = milestone.task_index.and_then(|idx| tasks.get(idx)) {
                sheet.write(row, 2, task.name.as_str()).map_err(xlsx_err)?;
            }
        }

        sheet.set_column_width(0, 25).ok();
        sheet.set_column_width(1, 14).ok();
        sheet.set_column_width(2, 35).ok();
        Ok(())
    }

    fn add_pause_sheet(
        &self,
        workbook: &mut Workbook,
        project: &Project,
        header: &Format,
    ) -> Result<(), RenderError> {
        let sheet = named_sheet(workbook, "PausePeriods")?;
        write_header(sheet, &["start", "end"], header)?;
        for (i, pause) in project.pause_periods.iter().enumerate() {
            let row = i as u32 + 1;
            write_date(sheet, row, 0, Some(pause.start))?;
            write_date(sheet, row, 1, Some(pause.end))?;
        }
        sheet.set_column_width(0, 14).ok();
        sheet.set_column_width(1, 14).ok();
        Ok(())
    }
}

impl Renderer for WorkbookWriter {
    type Output = Vec<u8>;

    fn render(&self, project: &Project) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(project)
    }
}

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

fn named_sheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet, RenderError> {
    workbook.add_worksheet().set_name(name).map_err(xlsx_err)
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], format: &Format) -> Result<(), RenderError> {
    for (col, title) in titles.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *title, format)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

/// Dates are written as `YYYY-MM-DD` text
fn write_date(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    date: Option<NaiveDate>,
) -> Result<(), RenderError> {
    if let Some(date) = date {
        sheet
            .write(row, col, date.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err)?;
    }
    Ok(())
}
