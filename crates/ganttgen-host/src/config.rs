//! Optional TOML configuration supplying defaults for the conversion pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ganttgen_render::CaptureSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::GenerateOptions;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "GANTTGEN_CONFIG";

/// Config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "ganttgen.toml";

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_width() -> u32 {
    1920
}
fn default_height() -> u32 {
    1080
}
fn default_virtual_time_budget_ms() -> u64 {
    3000
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub palette: Option<String>,
    #[serde(default)]
    pub png: bool,
    #[serde(default = "default_true")]
    pub snapshot: bool,
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[export]` table
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Browser binary; takes priority over `GANTTGEN_CHROME`
    #[serde(default)]
    pub chrome: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_virtual_time_budget_ms")]
    pub virtual_time_budget_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            palette: None,
            png: false,
            snapshot: default_true(),
            template: None,
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            chrome: None,
            timeout_secs: default_timeout_secs(),
            width: default_width(),
            height: default_height(),
            virtual_time_budget_ms: default_virtual_time_budget_ms(),
        }
    }
}

impl ExportConfig {
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            width: self.width,
            height: self.height,
            virtual_time_budget: Duration::from_millis(self.virtual_time_budget_ms),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load the explicit file, else `$GANTTGEN_CONFIG`, else `./ganttgen.toml`
    /// when present. With none of them the built-in defaults apply.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        match locate(explicit, from_env, Path::new(".")) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Options for one conversion, seeded from this config
    pub fn generate_options(&self, input: impl Into<String>) -> GenerateOptions {
        GenerateOptions {
            input_path: input.into(),
            output_path: None,
            palette: self.palette.clone(),
            export_png: self.png,
            output_dir: self.output_dir.clone(),
            template: self.template.clone(),
            snapshot: self.snapshot,
            capture: self.export.capture_settings(),
            browser: self.export.chrome.clone(),
        }
    }
}

fn locate(explicit: Option<&Path>, from_env: Option<PathBuf>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if from_env.is_some() {
        return from_env;
    }
    let local = cwd.join(CONFIG_FILE_NAME);
    local.is_file().then_some(local)
}
