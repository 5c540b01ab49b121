//! # ganttgen-render
//!
//! Output backends for GanttGen projects.
//!
//! This crate provides:
//! - Standalone HTML chart assembly from a template
//! - Editable workbook export in the tabular input layout
//! - PNG export through a headless rendering surface
//!
//! ## Example
//!
//! ```rust,ignore
//! use ganttgen_core::Renderer;
//! use ganttgen_render::{ChartAssembler, ChromeLauncher, PngExporter, WorkbookWriter};
//!
//! // Standalone HTML chart
//! let html = ChartAssembler::new().render(&project)?;
//!
//! // Workbook for editing
//! let xlsx_bytes = WorkbookWriter::new().render(&project)?;
//! std::fs::write("plan.xlsx", xlsx_bytes)?;
//!
//! // Transparent PNG of a written chart
//! let png = PngExporter::new(ChromeLauncher::default()).export(Path::new("output/plan_gantt_chart.html"))?;
//! ```

pub mod excel;
pub mod export;
pub mod html;

pub use excel::WorkbookWriter;
pub use export::{
    find_browser, find_browser_in, trim_transparent, CaptureSettings, ChromeLauncher, ExportError, PngExporter,
    RenderSurface, SurfaceLauncher,
};
pub use html::{default_output_path, payload, write_snapshot, ChartAssembler, CONFIG_MARKER, DEFAULT_TEMPLATE};
