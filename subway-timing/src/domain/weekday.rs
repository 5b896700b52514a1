//! Canonical weekday names used by weekday-set labels.

use chrono::Weekday;

/// Two-character weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Canonical name for a weekday, as spelled in timetable headings.
pub fn canonical_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}
