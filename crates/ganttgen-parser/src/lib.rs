//! # ganttgen-parser
//!
//! Input decoding for GanttGen.
//!
//! This crate provides:
//! - Declarative JSON decoding (`.json`)
//! - Tabular workbook decoding (`.xlsx`, `.xls`)
//! - Normalization into one canonical `Project` with resolved task colors
//!
//! ## Example
//!
//! ```rust
//! use ganttgen_parser::parse_json;
//!
//! let input = r##"{
//!     "title": "Launch",
//!     "timelineStart": "2025-01-01",
//!     "timelineEnd": "2025-03-31",
//!     "palette": ["#AAAAAA", "#BBBBBB"],
//!     "tasks": [
//!         { "name": "Plan", "start": "2025-01-06", "end": "2025-01-24", "colorIndex": 1 }
//!     ]
//! }"##;
//!
//! let project = parse_json(input).unwrap();
//! assert_eq!(project.task_list()[0].color.as_deref(), Some("#BBBBBB"));
//! ```

pub mod json;
pub mod lenient;
pub mod normalize;
pub mod workbook;

pub use normalize::Normalizer;

use std::path::{Path, PathBuf};

use ganttgen_core::Project;
use thiserror::Error;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read workbook {}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Invalid value in {}: {message}", .path.display())]
    InvalidValue { path: PathBuf, message: String },

    #[error("Unsupported file format: {extension}. Expected .json or .xlsx")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

impl ParseError {
    /// Path of the input that failed
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Json { path, .. }
            | Self::Workbook { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::UnsupportedFormat { path, .. } => path,
        }
    }

    pub(crate) fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Supported input encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Declarative document (.json)
    Json,
    /// Tabular workbook (.xlsx, .xls)
    Workbook,
}

/// Detect the input encoding from the file extension (case-insensitive)
pub fn detect_format(path: &Path) -> Result<FileFormat, ParseError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(FileFormat::Json),
        "xlsx" | "xls" => Ok(FileFormat::Workbook),
        _ => Err(ParseError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", extension)
            },
        }),
    }
}

/// Parse and normalize a project file (auto-detects format)
pub fn parse_file(path: &Path) -> Result<Project, ParseError> {
    Normalizer::new(rand::rng()).parse_file(path)
}

/// Parse and normalize a declarative JSON document held in memory
pub fn parse_json(input: &str) -> Result<Project, ParseError> {
    Normalizer::new(rand::rng()).parse_json(input)
}
