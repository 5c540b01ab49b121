//! Chart document assembly
//!
//! The chart itself is drawn by the template's own script. Assembly embeds
//! the serialized project in place of the `{{CONFIG}}` marker and writes the
//! resulting standalone document.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use ganttgen_core::{Project, RenderError, Renderer};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

/// Placeholder replaced by the serialized project
pub const CONFIG_MARKER: &str = "{{CONFIG}}";

/// Built-in chart template
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/gantt_template.html");

/// Substitutes a project into a chart template
#[derive(Clone, Debug)]
pub struct ChartAssembler {
    template: Cow<'static, str>,
}

impl Default for ChartAssembler {
    fn default() -> Self {
        Self {
            template: Cow::Borrowed(DEFAULT_TEMPLATE),
        }
    }
}

impl ChartAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom template text
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Cow::Owned(template.into()),
        }
    }

    /// Load a custom template from disk
    pub fn from_template_file(path: &Path) -> Result<Self, RenderError> {
        let template = fs::read_to_string(path)?;
        Ok(Self::with_template(template))
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Produce the standalone document text
    pub fn assemble(&self, project: &Project) -> Result<String, RenderError> {
        if !self.template.contains(CONFIG_MARKER) {
            return Err(RenderError::InvalidData(format!(
                "template has no {} marker",
                CONFIG_MARKER
            )));
        }
        let payload = payload(project)?;
        Ok(self.template.replacen(CONFIG_MARKER, &payload, 1))
    }

    /// Assemble and write the document, creating parent directories
    pub fn write(&self, project: &Project, path: &Path) -> Result<(), RenderError> {
        let document = self.assemble(project)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, document)?;
        debug!(path = %path.display(), "Wrote chart document");
        Ok(())
    }
}

impl Renderer for ChartAssembler {
    type Output = String;

    fn render(&self, project: &Project) -> Result<String, RenderError> {
        self.assemble(project)
    }
}

/// Serialize a project as 4-space indented JSON safe to embed in a script
pub fn payload(project: &Project) -> Result<String, RenderError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    project
        .serialize(&mut serializer)
        .map_err(|e| RenderError::Format(e.to_string()))?;
    let json = String::from_utf8(buffer).map_err(|e| RenderError::Format(e.to_string()))?;
    Ok(json.replace("</", "<\\/"))
}

/// Write the serialized project next to the chart.
///
/// Failures are logged and reported as `false`; they never abort generation.
pub fn write_snapshot(project: &Project, path: &Path) -> bool {
    let result = serde_json::to_string_pretty(project)
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => {
            debug!(path = %path.display(), "Wrote project snapshot");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not write project snapshot");
            false
        }
    }
}

/// `<output_dir>/<stem>_gantt_chart[_<preset>].html`
pub fn default_output_path(input: &Path, output_dir: &Path, preset: Option<&str>) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "project".into(), |s| s.to_string_lossy());
    let file_name = match preset {
        Some(preset) => format!("{}_gantt_chart_{}.html", stem, preset),
        None => format!("{}_gantt_chart.html", stem),
    };
    output_dir.join(file_name)
}
