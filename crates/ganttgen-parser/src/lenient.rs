//! Parse-with-fallback conversions for loosely typed input values.
//!
//! Each function returns `None` when the value cannot be read as the
//! requested type; callers decide the fallback.

use chrono::{Days, NaiveDate};

/// A non-negative integral number as a palette index
pub fn index_from_f64(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

/// A palette index written as text (`"2"`, `" 2.0 "`)
pub fn index_from_text(text: &str) -> Option<usize> {
    text.trim().parse::<f64>().ok().and_then(index_from_f64)
}

/// A non-negative, finite hour count
pub fn hours_from_f64(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// An hour count written as text
pub fn hours_from_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().and_then(hours_from_f64)
}

/// A boolean written as `true/false`, `yes/no` or `1/0`
pub fn flag_from_text(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Spreadsheet serial day number to a calendar date.
///
/// Day zero is 1899-12-30; any time-of-day fraction is dropped.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

/// Turn the two-character sequence `\n` into a line break
pub fn milestone_label(text: &str) -> String {
    text.trim().replace("\\n", "\n")
}
