//! Decode → palette → color resolution → preset.
//!
//! The random source is injected so declarative input can be normalized
//! reproducibly in tests.

use std::path::Path;

use ganttgen_core::{
    apply_preset, default_palette, find_preset, resolve_preset, resolve_task_colors,
    AdjacencySafeRandom, ColorResolutionStrategy, PaletteCycle, Project, ResolvedPalette,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{detect_format, json, workbook, FileFormat, ParseError};

/// Turns one input source into a canonical project with resolved colors
#[derive(Debug)]
pub struct Normalizer<R> {
    rng: R,
    preset: Option<String>,
    warnings: Vec<String>,
}

impl<R: Rng> Normalizer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            preset: None,
            warnings: Vec::new(),
        }
    }

    /// Palette preset that overrides whatever the input declares
    pub fn preset(mut self, name: Option<&str>) -> Self {
        self.preset = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        self
    }

    /// Non-fatal problems noticed so far
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Drain the collected warnings
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Parse a file, choosing the decoder from its extension
    pub fn parse_file(&mut self, path: &Path) -> Result<Project, ParseError> {
        let format = detect_format(path)?;
        info!(path = %path.display(), ?format, "Reading input");

        let project = match format {
            FileFormat::Json => {
                let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                self.decode_json(&content, path)?
            }
            FileFormat::Workbook => {
                if !path.exists() {
                    return Err(ParseError::Io {
                        path: path.to_path_buf(),
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                    });
                }
                workbook::decode(path, &mut self.warnings)?
            }
        };

        Ok(self.normalize(project, format))
    }

    /// Parse a declarative document held in memory
    pub fn parse_json(&mut self, input: &str) -> Result<Project, ParseError> {
        let project = self.decode_json(input, Path::new("<input>"))?;
        Ok(self.normalize(project, FileFormat::Json))
    }

    fn decode_json(&mut self, input: &str, source: &Path) -> Result<Project, ParseError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| ParseError::Json {
                path: source.to_path_buf(),
                source: e,
            })?;
        json::decode(&value, source, &mut self.warnings)
    }

    /// Resolve colors and presets on a decoded project
    pub fn normalize(&mut self, mut project: Project, format: FileFormat) -> Project {
        if project.palette.is_empty() {
            debug!("No palette in input, using default");
            project.palette = default_palette();
        }

        let requested = self.preset.clone().or_else(|| project.palette_preset.clone());
        let preset = requested.map(|name| self.lookup_preset(&name));

        let mut cycle = PaletteCycle;
        let mut random = AdjacencySafeRandom::new(&mut self.rng);
        let strategy: &mut dyn ColorResolutionStrategy = match format {
            FileFormat::Workbook => &mut cycle,
            FileFormat::Json => &mut random,
        };

        match &preset {
            Some(preset) => {
                debug!(preset = preset.id, "Applying palette preset");
                apply_preset(&mut project, preset, strategy);
            }
            None => resolve_task_colors(&mut project, strategy),
        }

        let task_count = project.task_list().len();
        for milestone in &mut project.milestones {
            if let Some(index) = milestone.task_index.filter(|&i| i >= task_count) {
                let message = format!(
                    "Milestone '{}' refers to task {} which does not exist",
                    milestone.name, index
                );
                warn!("{}", message);
                self.warnings.push(message);
                milestone.task_index = None;
            }
        }

        project
    }

    fn lookup_preset(&mut self, name: &str) -> ResolvedPalette {
        match find_preset(name) {
            Some(preset) => preset.into(),
            None => {
                let message = format!("Unknown palette preset '{}', using alternating", name);
                warn!("{}", message);
                self.warnings.push(message);
                resolve_preset(None)
            }
        }
    }
}
