//! Free-text labels from the timetable document.

use std::borrow::Borrow;
use std::fmt;

use chrono::Weekday;

use super::weekday::canonical_name;

/// Name of a station, taken verbatim (trimmed) from a station line.
///
/// Station names are not validated: any line that is not one of the other
/// line kinds opens a station.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationName(String);

impl StationName {
    /// Create a station name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Label of a direction under a station, e.g. `往机场方向`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DirectionLabel(String);

impl DirectionLabel {
    /// Create a direction label, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectionLabel({})", self.0)
    }
}

impl fmt::Display for DirectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DirectionLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Heading that scopes an hour table to some days of the week,
/// e.g. `周一至周五` or `周六日`.
///
/// Matching is plain substring containment of the canonical weekday name.
/// A label only covers the days it spells out: `周一至周五` covers Monday
/// and Friday but not Wednesday, and `周六日` covers Saturday but not Sunday.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use subway_timing::domain::WeekdaySetLabel;
///
/// let label = WeekdaySetLabel::new("周一周二周三周四周五");
/// assert!(label.covers(Weekday::Wed));
/// assert!(!label.covers(Weekday::Sat));
///
/// // Ranges are not expanded
/// assert!(!WeekdaySetLabel::new("周一至周五").covers(Weekday::Wed));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct WeekdaySetLabel(String);

impl WeekdaySetLabel {
    /// Create a weekday-set label, trimming surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_string())
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label names the given day.
    pub fn covers(&self, day: Weekday) -> bool {
        self.0.contains(canonical_name(day))
    }
}

impl fmt::Debug for WeekdaySetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeekdaySetLabel({})", self.0)
    }
}

impl fmt::Display for WeekdaySetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
