//! # ganttgen-core
//!
//! Core domain model and traits for GanttGen.
//!
//! This crate provides:
//! - Domain types: `Project`, `Task`, `Milestone`, `PausePeriod`
//! - Built-in palette presets and their resolution rules
//! - Task color resolution, including adjacency-safe random assignment
//! - Aggregated validation of a normalized project
//! - The `Renderer` trait and rendering error type
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ganttgen_core::{validate, Project, Task};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
//!
//! let project = Project::new("Website Relaunch")
//!     .timeline(d(1, 1), d(3, 31))
//!     .task(Task::new("Discovery", d(1, 6), d(1, 24)).color("#F01840"))
//!     .task(Task::new("Build", d(1, 27), d(3, 14)).color("#402848"));
//!
//! assert!(validate(&project).is_ok());
//! ```

pub mod color;
pub mod palette;
pub mod validate;

pub use color::{
    apply_preset, assign_colors, resolve_task_colors, AdjacencySafeRandom,
    ColorResolutionStrategy, PaletteCycle,
};
pub use palette::{default_palette, find_preset, presets, resolve_preset, PalettePreset, ResolvedPalette};
pub use validate::{collect_violations, validate, ValidationError};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// A color value as written in input documents (normally `#RRGGBB`)
pub type Color = String;

/// Maximum number of subtasks carried by a single task
pub const MAX_SUBTASKS: usize = 10;

/// Title used when a workbook leaves the project title blank
pub const DEFAULT_TITLE: &str = "PROJECT TIMELINE";

// ============================================================================
// Project
// ============================================================================

/// The canonical model of one Gantt chart.
///
/// Field order is the serialized key order consumed by the chart template.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Chart title
    pub title: String,
    /// First day shown on the timeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_start: Option<NaiveDate>,
    /// Last day shown on the timeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_end: Option<NaiveDate>,
    /// Whether the milestone lane is drawn
    pub show_milestones: bool,
    /// Ordered colors tasks are resolved against
    pub palette: Vec<Color>,
    /// Name of the preset the palette came from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_preset: Option<String>,
    /// Left-border accent drawn on task labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_border: Option<Color>,
    /// Text accent used for task names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<Color>,
    /// Tasks in display order; `None` when the input carried no task list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    /// Milestones in display order
    pub milestones: Vec<Milestone>,
    /// Intervals during which task bars show a break
    pub pause_periods: Vec<PausePeriod>,
}

impl Project {
    /// Create an empty project with the default palette
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            timeline_start: None,
            timeline_end: None,
            show_milestones: true,
            palette: default_palette(),
            palette_preset: None,
            accent_border: None,
            accent_color: None,
            tasks: Some(Vec::new()),
            milestones: Vec::new(),
            pause_periods: Vec::new(),
        }
    }

    /// Set the timeline bounds
    pub fn timeline(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.timeline_start = Some(start);
        self.timeline_end = Some(end);
        self
    }

    /// Replace the palette
    pub fn palette<I, C>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        self.palette = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Append a task
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.get_or_insert_with(Vec::new).push(task);
        self
    }

    /// Append a milestone
    pub fn milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    /// Append a pause period
    pub fn pause(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.pause_periods.push(PausePeriod { start, end });
        self
    }

    /// Tasks as a slice (empty when the task list is missing)
    pub fn task_list(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or(&[])
    }

    /// Mutable tasks (empty when the task list is missing)
    pub fn task_list_mut(&mut self) -> &mut [Task] {
        self.tasks.as_deref_mut().unwrap_or(&mut [])
    }

    /// Find the index of the first task whose name matches exactly
    pub fn task_index_by_name(&self, name: &str) -> Option<usize> {
        self.task_list().iter().position(|t| t.name == name)
    }
}

// ============================================================================
// Task
// ============================================================================

/// One bar on the chart
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Display name
    pub name: String,
    /// First day of the bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Last day of the bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Estimated effort in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    /// Bullet points shown under the task name
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<String>,
    /// Resolved bar color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Position in the project palette
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_index: Option<usize>,
    /// Color written in the input, kept so resolution can be re-run
    #[serde(skip)]
    pub declared_color: Option<Color>,
}

impl Task {
    /// Create a task spanning `start..end`
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start: Some(start),
            end: Some(end),
            hours: None,
            subtasks: Vec::new(),
            color: None,
            color_index: None,
            declared_color: None,
        }
    }

    /// Create a task with no dates, as decoded from incomplete input
    pub fn unscheduled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            hours: None,
            subtasks: Vec::new(),
            color: None,
            color_index: None,
            declared_color: None,
        }
    }

    /// Set the effort in hours
    pub fn hours(mut self, hours: f64) -> Self {
        self.hours = Some(hours);
        self
    }

    /// Append a subtask
    pub fn subtask(mut self, text: impl Into<String>) -> Self {
        self.subtasks.push(text.into());
        self
    }

    /// Declare an explicit color
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        let color = color.into();
        self.declared_color = Some(color.clone());
        self.color = Some(color);
        self
    }

    /// Reference a palette entry
    pub fn color_index(mut self, index: usize) -> Self {
        self.color_index = Some(index);
        self
    }
}

// ============================================================================
// Milestones and pauses
// ============================================================================

/// A dated marker, optionally attached to a task row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Label; may contain `\n` line breaks
    pub name: String,
    pub date: NaiveDate,
    /// Zero-based index into `Project::tasks`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_index: Option<usize>,
}

impl Milestone {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            task_index: None,
        }
    }

    /// Attach to a task row
    pub fn on_task(mut self, index: usize) -> Self {
        self.task_index = Some(index);
        self
    }
}

/// A closed date interval rendered as a break in task bars
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PausePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ============================================================================
// Dates
// ============================================================================

/// Parse a calendar date from loosely formatted text.
///
/// Accepts `YYYY-MM-DD` and ISO date-times whose first ten characters are a
/// date. Returns `None` for blank or unrecognized text.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let prefix = text.get(..10)?;
    match text.as_bytes().get(10) {
        Some(b'T' | b' ') => NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok(),
        _ => None,
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a validated project to the output format
    fn render(&self, project: &Project) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
