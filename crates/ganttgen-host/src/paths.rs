//! Validation of path strings handed over by a host process.

use std::path::PathBuf;

/// Whether a host-supplied path string names something usable.
///
/// Surrounding whitespace is ignored. Empty strings, `.` and a bare drive
/// designator such as `C:` are rejected; `C:\` and `C:/` are fine.
pub fn is_valid_path(raw: &str) -> bool {
    let path = raw.trim();
    !(path.is_empty() || path == "." || is_bare_drive(path))
}

/// The trimmed path, or `None` when [`is_valid_path`] rejects it
pub fn clean_path(raw: &str) -> Option<PathBuf> {
    is_valid_path(raw).then(|| PathBuf::from(raw.trim()))
}

fn is_bare_drive(path: &str) -> bool {
    matches!(path.as_bytes(), [letter, b':'] if letter.is_ascii_alphabetic())
}
