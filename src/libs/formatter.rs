//! Formatting helpers for hour values and log timestamps.
//!
//! Working hours arrive from the backend as fractional hours (`5.12` is five
//! hours and a bit over seven minutes). Every view shows them as `"{H}h {M}m"`.
//!
//! ## Format Specifications
//!
//! - Hours are the whole part of the value, unpadded
//! - Minutes are the fractional part times sixty, rounded to the nearest minute
//! - Minutes that round up to 60 carry into the hour (`1.999` → `"2h 0m"`)
//! - Missing, zero, negative and non-finite values render as `"0h 0m"`
//!
//! ## Examples
//!
//! ```rust
//! use wadash::libs::formatter::format_hours;
//!
//! assert_eq!(format_hours(Some(5.5)), "5h 30m");
//! assert_eq!(format_hours(Some(8.12)), "8h 7m");
//! assert_eq!(format_hours(None), "0h 0m");
//! ```

use chrono::{NaiveDate, NaiveDateTime};

/// Formats fractional hours as `"{H}h {M}m"`.
pub fn format_hours(hours: Option<f64>) -> String {
    let (h, m) = split_hours(hours.unwrap_or(0.0));
    format!("{}h {}m", h, m)
}

/// Splits fractional hours into whole hours and rounded minutes.
///
/// The minute part is always in `0..60`.
pub fn split_hours(hours: f64) -> (u64, u64) {
    if !hours.is_finite() || hours <= 0.0 {
        return (0, 0);
    }

    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0).round() as u64;
    let whole = whole as u64;

    if minutes >= 60 {
        (whole + 1, minutes - 60)
    } else {
        (whole, minutes)
    }
}

/// Formats a log timestamp relative to `today`.
///
/// Logs from today show only the time (`"14:05"`); older logs carry the date
/// (`"12 Mar 14:05"`).
pub fn format_timestamp(timestamp: &NaiveDateTime, today: NaiveDate) -> String {
    if timestamp.date() == today {
        timestamp.format("%H:%M").to_string()
    } else {
        timestamp.format("%d %b %H:%M").to_string()
    }
}
