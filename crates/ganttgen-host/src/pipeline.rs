//! End-to-end conversion: parse → validate → assemble → (optional) export.

use std::path::{Path, PathBuf};

use ganttgen_core::{validate, RenderError, ValidationError};
use ganttgen_parser::{Normalizer, ParseError};
use ganttgen_render::{
    default_output_path, write_snapshot, CaptureSettings, ChartAssembler, ChromeLauncher,
    PngExporter, SurfaceLauncher,
};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::paths::clean_path;

// ============================================================================
// Options and results
// ============================================================================

/// Everything one conversion needs.
///
/// Paths arrive as host strings and are validated before use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Input document (`.json`, `.xlsx` or `.xls`)
    pub input_path: String,
    /// Chart destination; derived from the input name when absent
    pub output_path: Option<String>,
    /// Preset that overrides the palette declared by the input
    pub palette: Option<String>,
    /// Rasterize the chart after writing it (default: off)
    pub export_png: bool,
    /// Directory for derived output paths (default: `output`)
    pub output_dir: PathBuf,
    /// Replacement chart template
    pub template: Option<PathBuf>,
    /// Write the serialized project next to the chart (default: on)
    pub snapshot: bool,
    pub capture: CaptureSettings,
    /// Browser binary for PNG export
    pub browser: Option<PathBuf>,
}

impl GenerateOptions {
    pub fn new(input_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            palette: None,
            export_png: false,
            output_dir: PathBuf::from("output"),
            template: None,
            snapshot: true,
            capture: CaptureSettings::default(),
            browser: None,
        }
    }

    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn palette(mut self, name: impl Into<String>) -> Self {
        self.palette = Some(name.into());
        self
    }

    pub fn png(mut self, enabled: bool) -> Self {
        self.export_png = enabled;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn snapshot(mut self, enabled: bool) -> Self {
        self.snapshot = enabled;
        self
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Launcher for the headless browser described by these options
    pub fn launcher(&self) -> ChromeLauncher {
        let launcher = ChromeLauncher::new(self.capture.clone());
        match &self.browser {
            Some(binary) => launcher.binary(binary.clone()),
            None => launcher,
        }
    }
}

/// Outcome of a successful conversion
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub html_path: PathBuf,
    /// Absent when export was not requested or failed
    pub png_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    /// Preset applied to the chart, if any
    pub palette: Option<String>,
    /// Non-fatal problems, including export failures
    pub warnings: Vec<String>,
    /// Human-readable progress log
    pub messages: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid {field} path: '{value}'")]
    InvalidPath { field: &'static str, value: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to write chart: {0}")]
    Render(#[from] RenderError),
}

// ============================================================================
// Progress
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStage {
    Starting,
    Parsing,
    Validating,
    GeneratingHtml,
    ExportingPng,
    Complete,
}

impl ProgressStage {
    /// Percentage reported when the stage begins
    pub fn percent(self) -> u8 {
        match self {
            Self::Starting => 10,
            Self::Parsing => 40,
            Self::Validating => 50,
            Self::GeneratingHtml => 60,
            Self::ExportingPng => 80,
            Self::Complete => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Parsing => "Parsing input",
            Self::Validating => "Validating project",
            Self::GeneratingHtml => "Generating HTML",
            Self::ExportingPng => "Exporting PNG",
            Self::Complete => "Complete",
        }
    }
}

/// Out-of-band progress notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub stage: ProgressStage,
    pub progress: u8,
}

impl From<ProgressStage> for ProgressUpdate {
    fn from(stage: ProgressStage) -> Self {
        Self {
            stage,
            progress: stage.percent(),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Convert with the configured browser and an OS-seeded random source
pub fn generate(
    options: &GenerateOptions,
    progress: &mut dyn FnMut(ProgressUpdate),
) -> Result<GenerateResult, GenerateError> {
    generate_with(options, options.launcher(), rand::rng(), progress)
}

/// Convert with an injected rendering surface and random source
pub fn generate_with<L, R>(
    options: &GenerateOptions,
    launcher: L,
    rng: R,
    progress: &mut dyn FnMut(ProgressUpdate),
) -> Result<GenerateResult, GenerateError>
where
    L: SurfaceLauncher,
    R: Rng,
{
    let mut result = GenerateResult::default();
    let mut stage = |stage: ProgressStage| {
        info!(progress = stage.percent(), "{}", stage.label());
        progress(stage.into());
    };

    stage(ProgressStage::Starting);
    let input = host_path("input", &options.input_path)?;
    let output = options
        .output_path
        .as_deref()
        .map(|raw| host_path("output", raw))
        .transpose()?;
    debug!(input = %input.display(), ?output, ?options.palette, "Resolved options");

    stage(ProgressStage::Parsing);
    let mut normalizer = Normalizer::new(rng).preset(options.palette.as_deref());
    let project = normalizer.parse_file(&input)?;
    result.warnings.extend(normalizer.take_warnings());
    result.messages.push(format!(
        "Parsed {} tasks and {} milestones from {}",
        project.task_list().len(),
        project.milestones.len(),
        input.display()
    ));

    stage(ProgressStage::Validating);
    validate(&project)?;

    stage(ProgressStage::GeneratingHtml);
    let assembler = match &options.template {
        Some(path) => ChartAssembler::from_template_file(path)?,
        None => ChartAssembler::new(),
    };
    let html_path = output.unwrap_or_else(|| {
        default_output_path(&input, &options.output_dir, project.palette_preset.as_deref())
    });
    assembler.write(&project, &html_path)?;
    result.messages.push(format!("Generated HTML: {}", html_path.display()));

    if options.snapshot {
        let snapshot = html_path.with_extension("json");
        if snapshot == html_path {
            warn!(path = %html_path.display(), "Snapshot would overwrite the chart, skipping");
            result.warnings.push(format!(
                "Skipped project snapshot: {} is the chart itself",
                snapshot.display()
            ));
        } else if write_snapshot(&project, &snapshot) {
            result.snapshot_path = Some(snapshot);
        } else {
            result
                .warnings
                .push(format!("Could not write project snapshot {}", snapshot.display()));
        }
    }

    if options.export_png {
        stage(ProgressStage::ExportingPng);
        result.png_path = export_png(launcher, &html_path, &mut result);
    }

    stage(ProgressStage::Complete);
    result.palette = project.palette_preset;
    result.html_path = html_path;
    Ok(result)
}

fn host_path(field: &'static str, raw: &str) -> Result<PathBuf, GenerateError> {
    clean_path(raw).ok_or_else(|| GenerateError::InvalidPath {
        field,
        value: raw.to_string(),
    })
}

/// Export failures are downgraded to warnings
fn export_png<L: SurfaceLauncher>(
    launcher: L,
    html_path: &Path,
    result: &mut GenerateResult,
) -> Option<PathBuf> {
    match PngExporter::new(launcher).export(html_path) {
        Ok(png) => {
            result.messages.push(format!("Exported PNG: {}", png.display()));
            Some(png)
        }
        Err(e) => {
            warn!(error = %e, "PNG export failed");
            result.warnings.push(format!("PNG export failed: {}", e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_percentages_increase() {
        let stages = [
            ProgressStage::Starting,
            ProgressStage::Parsing,
            ProgressStage::Validating,
            ProgressStage::GeneratingHtml,
            ProgressStage::ExportingPng,
            ProgressStage::Complete,
        ];
        let percents: Vec<u8> = stages.iter().map(|s| s.percent()).collect();
        assert_eq!(percents, [10, 40, 50, 60, 80, 100]);
    }

    #[test]
    fn test_options_defaults() {
        let options = GenerateOptions::new("plan.json");
        assert_eq!(options.output_dir, PathBuf::from("output"));
        assert!(options.snapshot);
        assert!(!options.export_png);
        assert_eq!(options.output_path, None);
        assert_eq!(options.capture, CaptureSettings::default());
    }

    #[test]
    fn test_launcher_uses_configured_browser() {
        let mut options = GenerateOptions::new("plan.json");
        assert_eq!(options.launcher().binary, None);

        options.browser = Some(PathBuf::from("/opt/chrome"));
        assert_eq!(options.launcher().binary, Some(PathBuf::from("/opt/chrome")));
    }

    #[test]
    fn test_progress_update_from_stage() {
        let update = ProgressUpdate::from(ProgressStage::GeneratingHtml);
        assert_eq!(update.progress, 60);
        assert_eq!(
            serde_json::to_string(&update).ok(),
            Some(r#"{"stage":"generatingHtml","progress":60}"#.to_string())
        );
    }
}
