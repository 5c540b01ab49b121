//! End-to-end pipeline tests with a scripted rendering surface

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ganttgen_host::{generate_with, GenerateError, GenerateOptions, ProgressUpdate};
use ganttgen_parser::ParseError;
use ganttgen_render::{ExportError, RenderSurface, SurfaceLauncher};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

const PLAN: &str = r##"{
    "title": "Beverage Machine Upgrade",
    "timelineStart": "2025-01-01",
    "timelineEnd": "2025-04-30",
    "palette": ["#FF0000", "#00FF00"],
    "tasks": [
        { "name": "Planning", "start": "2025-01-06", "end": "2025-01-24", "hours": 30 },
        { "name": "Installation", "start": "2025-01-27", "end": "2025-02-21", "hours": 40 },
        { "name": "Training", "start": "2025-02-24", "end": "2025-03-07" }
    ],
    "milestones": [
        { "name": "Vendor\nSelected", "date": "2025-01-24", "taskIndex": 0 },
        { "name": "Undated" }
    ]
}"##;

/// Launcher whose surface either fails to start or returns a fixed image
struct Scripted {
    available: bool,
}

struct Canvas;

impl SurfaceLauncher for Scripted {
    fn launch(&self) -> Result<Box<dyn RenderSurface>, ExportError> {
        if self.available {
            Ok(Box::new(Canvas))
        } else {
            Err(ExportError::BrowserNotFound)
        }
    }
}

impl RenderSurface for Canvas {
    fn open(&mut self, _document: &Path) -> Result<(), ExportError> {
        Ok(())
    }

    fn capture(&mut self) -> Result<Vec<u8>, ExportError> {
        let mut image = RgbaImage::new(16, 16);
        image.put_pixel(4, 4, Rgba([240, 24, 64, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image).write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

fn write_plan(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("plan.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn options(input: &Path, output_dir: &Path) -> GenerateOptions {
    GenerateOptions::new(input.to_string_lossy()).output_dir(output_dir)
}

fn run(
    options: &GenerateOptions,
    available: bool,
) -> (Result<ganttgen_host::GenerateResult, GenerateError>, Vec<u8>) {
    let mut seen = Vec::new();
    let result = generate_with(
        options,
        Scripted { available },
        StdRng::seed_from_u64(3),
        &mut |update: ProgressUpdate| seen.push(update.progress),
    );
    (result, seen)
}

#[test]
fn generates_chart_and_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let out = dir.path().join("output");

    let (result, progress) = run(&options(&input, &out), true);
    let result = result.unwrap();

    assert_eq!(result.html_path, out.join("plan_gantt_chart.html"));
    assert_eq!(result.snapshot_path, Some(out.join("plan_gantt_chart.json")));
    assert_eq!(result.png_path, None);
    assert_eq!(result.palette, None);
    assert_eq!(progress, [10, 40, 50, 60, 100]);

    let html = std::fs::read_to_string(&result.html_path).unwrap();
    assert!(html.contains("\"title\": \"Beverage Machine Upgrade\""));
    assert!(out.join("plan_gantt_chart.json").is_file());

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("Undated"));
    assert!(result
        .messages
        .iter()
        .any(|m| m.starts_with("Generated HTML: ")));
}

#[test]
fn preset_overrides_declared_palette() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let out = dir.path().join("output");

    let (result, _) = run(&options(&input, &out).palette("REDS"), true);
    let result = result.unwrap();

    assert_eq!(result.html_path, out.join("plan_gantt_chart_reds.html"));
    assert_eq!(result.palette.as_deref(), Some("reds"));

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("plan_gantt_chart_reds.json")).unwrap())
            .unwrap();
    let reds = ["#F01840", "#C01830", "#901226", "#600C1C", "#300810"];
    assert_eq!(snapshot["palette"], serde_json::json!(reds));
    for task in snapshot["tasks"].as_array().unwrap() {
        assert!(reds.contains(&task["color"].as_str().unwrap()));
    }
}

#[test]
fn export_failure_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let out = dir.path().join("output");

    let (result, progress) = run(&options(&input, &out).png(true), false);
    let result = result.unwrap();

    assert!(result.html_path.is_file());
    assert_eq!(result.png_path, None);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("PNG export failed")));
    assert_eq!(progress, [10, 40, 50, 60, 80, 100]);
}

#[test]
fn export_success_writes_trimmed_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let out = dir.path().join("output");

    let (result, _) = run(&options(&input, &out).png(true).snapshot(false), true);
    let result = result.unwrap();

    let png = result.png_path.unwrap();
    assert_eq!(png, out.join("plan_gantt_chart.png"));
    let image = image::open(&png).unwrap();
    assert_eq!((image.width(), image.height()), (1, 1));
    assert_eq!(result.snapshot_path, None);
    assert!(!out.join("plan_gantt_chart.json").exists());
}

#[test]
fn explicit_output_path_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let target = dir.path().join("deck/chart.html");

    let (result, _) = run(
        &options(&input, dir.path()).output(format!("  {}  ", target.display())),
        true,
    );
    assert_eq!(result.unwrap().html_path, target);
    assert!(target.is_file());
}

#[test]
fn snapshot_never_replaces_a_json_named_chart() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(dir.path(), PLAN);
    let target = dir.path().join("deck/chart.json");

    let (result, _) = run(
        &options(&input, dir.path()).output(target.to_string_lossy()),
        true,
    );
    let result = result.unwrap();

    assert_eq!(result.html_path, target);
    assert_eq!(result.snapshot_path, None);
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("Skipped project snapshot")));
}

#[test]
fn validation_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_plan(
        dir.path(),
        r#"{
            "title": "Flat",
            "timelineStart": "2025-01-01",
            "timelineEnd": "2025-01-01",
            "tasks": [{ "name": "Only", "start": "2025-01-06" }]
        }"#,
    );
    let out = dir.path().join("output");

    let (result, progress) = run(&options(&input, &out), true);
    let err = result.unwrap_err();

    assert!(matches!(err, GenerateError::Validation(_)));
    let message = err.to_string();
    assert!(message.contains("timelineStart must be before timelineEnd"));
    assert!(message.contains("Task 1: Missing end date"));
    assert!(!out.exists());
    assert_eq!(progress, [10, 40, 50]);
}

#[test]
fn unsupported_format_fails_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let input = dir.path().join("plan.csv");

    let (result, _) = run(&options(&input, &out), true);
    let err = result.unwrap_err();

    assert!(matches!(
        err,
        GenerateError::Parse(ParseError::UnsupportedFormat { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Unsupported file format: .csv. Expected .json or .xlsx"
    );
}

#[test]
fn rejects_bare_drive_input() {
    let (result, progress) = run(&GenerateOptions::new("C:"), true);
    let err = result.unwrap_err();

    assert!(matches!(err, GenerateError::InvalidPath { field: "input", .. }));
    assert_eq!(err.to_string(), "Invalid input path: 'C:'");
    assert_eq!(progress, [10]);
}
