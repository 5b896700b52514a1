//! Classification of single timetable lines.
//!
//! Each trimmed line falls into exactly one [`Line`] kind. Checks run in a
//! fixed priority order and the first match wins, so a line that looks like
//! both a weekday heading and a direction is a weekday heading.

/// Prefix of a comment line.
pub const COMMENT_MARKER: &str = "//";

/// Prefix of the hour-column header row.
pub const HEADER_PREFIX: &str = "小时 |";

/// First character of a weekday-set heading.
pub const WEEKDAY_MARKER: char = '周';

/// Substring that marks a direction line.
pub const DIRECTION_MARKER: &str = "方向";

/// Exclusive upper bound for minute values.
const MINUTES_PER_HOUR: i64 = 60;

/// One classified line of a timetable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty after trimming.
    Blank,
    /// Starts with `//`.
    Comment,
    /// The `小时 |` column header; documentation only.
    Header,
    /// An hour followed by its departure minutes.
    HourRow(HourRow),
    /// Opens a weekday-set scope under the current direction.
    WeekdaySet(&'a str),
    /// Opens a direction scope under the current station.
    Direction(&'a str),
    /// Anything else opens a station scope.
    Station(&'a str),
}

/// Parsed contents of an hour row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourRow {
    /// Hour of day. `None` if the hour token doesn't fit in a `u32`.
    /// Otherwise not range-checked: an hour of 24 or more is stored but
    /// never matched.
    pub hour: Option<u32>,

    /// Minutes in [0, 60), in the order they were written.
    pub minutes: Vec<u32>,

    /// Number of minute tokens dropped as out of range.
    pub dropped: usize,
}

/// Classify a single raw line.
///
/// The line is trimmed first. Labels borrowed from the returned value are the
/// trimmed text.
///
/// # Examples
///
/// ```
/// use subway_timing::timetable::{Line, classify};
///
/// assert_eq!(classify("  "), Line::Blank);
/// assert_eq!(classify("// 1号线"), Line::Comment);
/// assert_eq!(classify("人民广场"), Line::Station("人民广场"));
/// assert_eq!(classify("往莘庄方向"), Line::Direction("往莘庄方向"));
/// assert_eq!(classify("周六周日"), Line::WeekdaySet("周六周日"));
/// assert!(matches!(classify("8 0 15 30"), Line::HourRow(_)));
/// ```
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with(COMMENT_MARKER) {
        return Line::Comment;
    }
    if let Some(row) = parse_hour_row(line) {
        return Line::HourRow(row);
    }
    if line.starts_with(HEADER_PREFIX) {
        return Line::Header;
    }
    if line.starts_with(WEEKDAY_MARKER) {
        return Line::WeekdaySet(line);
    }
    if line.contains(DIRECTION_MARKER) {
        return Line::Direction(line);
    }
    Line::Station(line)
}

/// Parse a line made only of integer tokens.
///
/// The hour token must be unsigned digits; minute tokens may carry a sign so
/// that a stray `-5` is dropped as out of range instead of turning the whole
/// row into a station name. Full-width digits count as digits.
fn parse_hour_row(line: &str) -> Option<HourRow> {
    let mut tokens = line.split_whitespace();
    let hour = ascii_digits(tokens.next()?)?;
    let rest = tokens.map(signed_integer).collect::<Option<Vec<String>>>()?;

    let mut minutes = Vec::with_capacity(rest.len());
    let mut dropped = 0;
    for token in rest {
        match token.parse::<i64>() {
            Ok(m) if (0..MINUTES_PER_HOUR).contains(&m) => minutes.push(m as u32),
            _ => dropped += 1,
        }
    }

    Some(HourRow {
        hour: hour.parse().ok(),
        minutes,
        dropped,
    })
}

/// Decimal value of an ASCII or full-width digit.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

/// The token rewritten as ASCII digits, if it is all digits.
fn ascii_digits(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    token
        .chars()
        .map(|c| digit_value(c).and_then(|d| char::from_digit(d, 10)))
        .collect()
}

/// Like [`ascii_digits`], keeping a leading `-` or `+`.
fn signed_integer(token: &str) -> Option<String> {
    match token.strip_prefix('-') {
        Some(digits) => ascii_digits(digits).map(|d| format!("-{d}")),
        None => ascii_digits(token.strip_prefix('+').unwrap_or(token)),
    }
}
