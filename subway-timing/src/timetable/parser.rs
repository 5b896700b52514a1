//! Timetable document parser.
//!
//! The document is read as a single fold over its lines. The fold keeps the
//! currently open station, direction and weekday set; each classified line
//! either opens a new scope or adds minutes under the open ones.
//!
//! The open direction and weekday set are held by label. A new station line
//! moves only the station pointer, so a repeated station heading carries on
//! under the same direction and weekday set. Labels are resolved against the
//! open station when a row needs them; a row whose scope doesn't exist there
//! stops the parse.

use tracing::{debug, error};

use super::error::ParseError;
use super::line::{Line, classify};
use super::schedule::Schedule;

/// Parse a timetable document, keeping whatever was read before a
/// structural error.
///
/// Never fails: a structural error is logged and the schedule built up to
/// that line is returned. Callers treat an empty schedule as "no stations
/// found".
///
/// # Examples
///
/// ```
/// use subway_timing::timetable::parse_timetable;
///
/// let text = "\
/// 人民广场
/// 往莘庄方向
/// 周一周二周三周四周五
/// 小时 | 分钟
/// 8 0 15 30
/// ";
/// let schedule = parse_timetable(text);
/// assert_eq!(schedule.station_count(), 1);
/// assert!(schedule.contains_route("人民广场", "往莘庄方向"));
/// ```
pub fn parse_timetable(text: &str) -> Schedule {
    let mut fold = Fold::default();
    for (idx, raw) in text.lines().enumerate() {
        if let Err(e) = fold.feed(idx + 1, raw) {
            error!(error = %e, "stopped parsing timetable");
            break;
        }
    }
    fold.finish()
}

/// Parse a timetable document, failing on the first structural error.
pub fn try_parse_timetable(text: &str) -> Result<Schedule, ParseError> {
    let mut fold = Fold::default();
    for (idx, raw) in text.lines().enumerate() {
        fold.feed(idx + 1, raw)?;
    }
    Ok(fold.finish())
}

/// Parse state threaded through the lines of one document.
#[derive(Debug, Default)]
struct Fold<'a> {
    schedule: Schedule,
    station: Option<usize>,
    direction: Option<&'a str>,
    day_set: Option<&'a str>,
    dropped_minutes: usize,
}

impl<'a> Fold<'a> {
    fn feed(&mut self, line_no: usize, raw: &'a str) -> Result<(), ParseError> {
        match classify(raw) {
            Line::Blank | Line::Comment | Line::Header => {}

            Line::Station(name) => {
                self.station = Some(self.schedule.open_station(name));
            }

            Line::Direction(label) => {
                let station = self
                    .station
                    .ok_or(ParseError::NoOpenStation { line: line_no })?;
                self.schedule.open_direction(station, label);
                self.direction = Some(label);
            }

            Line::WeekdaySet(label) => {
                let (station, direction) = self
                    .open_direction()
                    .ok_or(ParseError::NoOpenDirection { line: line_no })?;
                self.schedule.open_day_set(station, direction, label);
                self.day_set = Some(label);
            }

            Line::HourRow(row) => {
                let scope = self
                    .open_day_set()
                    .ok_or(ParseError::NoOpenWeekdaySet { line: line_no })?;
                self.dropped_minutes += row.dropped;
                match row.hour {
                    Some(hour) => self.schedule.append_minutes(scope, hour, &row.minutes),
                    None => debug!(line = line_no, "skipping hour row with unreadable hour"),
                }
            }
        }
        Ok(())
    }

    /// The open direction, resolved under the open station.
    fn open_direction(&self) -> Option<(usize, usize)> {
        let station = self.station?;
        let direction = self.schedule.find_direction(station, self.direction?)?;
        Some((station, direction))
    }

    /// The open weekday set, resolved under the open station and direction.
    fn open_day_set(&self) -> Option<(usize, usize, usize)> {
        let (station, direction) = self.open_direction()?;
        let day_set = self
            .schedule
            .find_day_set(station, direction, self.day_set?)?;
        Some((station, direction, day_set))
    }

    fn finish(self) -> Schedule {
        debug!(
            stations = self.schedule.station_count(),
            routes = self.schedule.routes().count(),
            dropped_minutes = self.dropped_minutes,
            "parsed timetable"
        );
        self.schedule
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn document() -> impl Strategy<Value = String> {
        let row = (0u32..24, prop::collection::vec(0u32..80, 0..6)).prop_map(|(h, ms)| {
            let mut line = h.to_string();
            for m in ms {
                line.push_str(&format!(" {m}"));
            }
            line
        });
        let block = (
            "[A-C]站",
            "[东南西北]方向",
            prop::sample::select(vec!["周一周二", "周三周四周五", "周六周日"]),
            prop::collection::vec(row, 0..5),
        )
            .prop_map(|(station, direction, days, rows)| {
                format!("{station}\n{direction}\n{days}\n小时 | 分钟\n{}\n", rows.join("\n"))
            });
        prop::collection::vec(block, 0..6).prop_map(|blocks| blocks.concat())
    }

    proptest! {
        /// Parsing the same document twice gives identical schedules
        #[test]
        fn idempotent(doc in document()) {
            prop_assert_eq!(parse_timetable(&doc), parse_timetable(&doc));
        }

        /// Well-formed documents never hit a structural error
        #[test]
        fn well_formed_parses_strictly(doc in document()) {
            prop_assert!(try_parse_timetable(&doc).is_ok());
        }

        /// Every stored minute is in range
        #[test]
        fn minutes_in_range(doc in document()) {
            let schedule = parse_timetable(&doc);
            for station in schedule.stations() {
                for direction in station.directions() {
                    for day in direction.day_sets() {
                        for hour in day.hours() {
                            prop_assert!(day.minutes(hour).iter().all(|m| *m < 60));
                        }
                    }
                }
            }
        }
    }
}
