//! Upcoming departures for a route.

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::warn;

use crate::domain::canonical_name;
use crate::timetable::Schedule;

/// How many departures a sensor shows.
pub const DEFAULT_DEPARTURE_COUNT: usize = 3;

const HOURS_PER_DAY: u32 = 24;

/// Why a route has no departures to show.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoService {
    /// The station isn't in the timetable.
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// The station has no such direction.
    #[error("unknown direction {direction} at {station}")]
    UnknownDirection { station: String, direction: String },

    /// No weekday set for this direction names today.
    #[error("no timetable for {station} {direction} on {weekday}")]
    NoMatchingWeekdaySet {
        station: String,
        direction: String,
        weekday: &'static str,
    },
}

/// Find up to `count` departures strictly after `now`.
///
/// The hour table is chosen from `now`'s weekday and then used for the next
/// 24 hours: hours from `now`'s hour through 23 fall on `now`'s date, hours
/// before it fall on the following date. A departure in the current minute
/// counts as already gone.
///
/// The result is ascending. Repeated minutes within an hour are listed once.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use subway_timing::departures::find_departures;
/// use subway_timing::timetable::parse_timetable;
///
/// let schedule = parse_timetable("A站\n北方向\n周五\n8 0 15 30\n");
/// // 2024-03-15 is a Friday
/// let now = NaiveDate::from_ymd_opt(2024, 3, 15)
///     .unwrap()
///     .and_hms_opt(8, 10, 0)
///     .unwrap();
///
/// let departures = find_departures(&schedule, "A站", "北方向", now, 3).unwrap();
/// let times: Vec<String> = departures.iter().map(|t| t.format("%H:%M").to_string()).collect();
/// assert_eq!(times, vec!["08:15", "08:30"]);
/// ```
pub fn find_departures(
    schedule: &Schedule,
    station: &str,
    direction: &str,
    now: NaiveDateTime,
    count: usize,
) -> Result<Vec<NaiveDateTime>, NoService> {
    let station_table = schedule
        .station(station)
        .ok_or_else(|| NoService::UnknownStation(station.to_string()))?;
    let direction_table =
        station_table
            .direction(direction)
            .ok_or_else(|| NoService::UnknownDirection {
                station: station.to_string(),
                direction: direction.to_string(),
            })?;

    let weekday = now.weekday();
    let day = direction_table
        .day_set_for(weekday)
        .ok_or_else(|| NoService::NoMatchingWeekdaySet {
            station: station.to_string(),
            direction: direction.to_string(),
            weekday: canonical_name(weekday),
        })?;

    let start_hour = now.hour();
    let today = now.date();
    let tomorrow = today.succ_opt();
    let mut departures = Vec::with_capacity(count);

    if count == 0 {
        return Ok(departures);
    }

    for offset in 0..HOURS_PER_DAY {
        let hour = (start_hour + offset) % HOURS_PER_DAY;
        let date = if hour < start_hour {
            match tomorrow {
                Some(d) => d,
                None => break,
            }
        } else {
            today
        };

        for minute in day.sorted_minutes(hour) {
            if hour == start_hour && minute <= now.minute() {
                continue;
            }
            let Some(at) = date.and_hms_opt(hour, minute, 0) else {
                continue;
            };
            departures.push(at);
            if departures.len() >= count {
                return Ok(departures);
            }
        }
    }

    Ok(departures)
}

/// Like [`find_departures`], but an unavailable route is simply "no
/// departures".
///
/// A missing weekday set is logged as a warning; unknown stations and
/// directions are not.
pub fn next_departures(
    schedule: &Schedule,
    station: &str,
    direction: &str,
    now: NaiveDateTime,
    count: usize,
) -> Vec<NaiveDateTime> {
    match find_departures(schedule, station, direction, now, count) {
        Ok(departures) => departures,
        Err(e @ NoService::NoMatchingWeekdaySet { .. }) => {
            warn!(error = %e, "no matching weekday set");
            Vec::new()
        }
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::parse_timetable;
    use chrono::NaiveDate;

    // 2024-03-11 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, s).unwrap()
    }

    fn hhmm(times: &[NaiveDateTime]) -> Vec<String> {
        times.iter().map(|t| t.format("%H:%M").to_string()).collect()
    }

    const WEEK: &str = "周一周二周三周四周五周六周日";

    fn schedule_with(rows: &str) -> Schedule {
        parse_timetable(&format!("A站\n北方向\n{WEEK}\n{rows}\n"))
    }

    #[test]
    fn next_three_in_same_hour() {
        let schedule = schedule_with("8 0 15 30 45");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 10, 0), 3).unwrap();
        assert_eq!(hhmm(&result), vec!["08:15", "08:30", "08:45"]);
        assert!(result.iter().all(|t| t.date() == monday()));
    }

    #[test]
    fn start_hour_is_searched_once() {
        let schedule = schedule_with("8 0 15 30");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 10, 0), 3).unwrap();

        assert_eq!(hhmm(&result), vec!["08:15", "08:30"]);
        // Hour 8 is the start hour, so 08:00 is never revisited as "tomorrow"
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn earlier_hour_rolls_to_next_day() {
        let schedule = schedule_with("8 0 15 30\n6 45");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 10, 0), 3).unwrap();

        assert_eq!(hhmm(&result), vec!["08:15", "08:30", "06:45"]);
        assert_eq!(result[2].date(), monday().succ_opt().unwrap());
    }

    #[test]
    fn current_minute_counts_as_departed() {
        let schedule = schedule_with("8 0 15 30");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 15, 0), 3).unwrap();
        assert_eq!(hhmm(&result), vec!["08:30"]);

        // Seconds into the minute don't change that
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 14, 59), 3).unwrap();
        assert_eq!(hhmm(&result), vec!["08:15", "08:30"]);
    }

    #[test]
    fn after_midnight_departure_is_next_day() {
        let schedule = schedule_with("1 0");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 23, 0, 0), 3).unwrap();

        assert_eq!(result, vec![at(monday().succ_opt().unwrap(), 1, 0, 0)]);
    }

    #[test]
    fn earlier_minute_in_start_hour_is_not_revisited() {
        let schedule = schedule_with("23 50");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 23, 55, 0), 3).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn later_hours_same_day() {
        let schedule = schedule_with("8 50\n9 5\n12 0");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 55, 0), 3).unwrap();
        assert_eq!(hhmm(&result), vec!["09:05", "12:00"]);
        assert!(result.iter().all(|t| t.date() == monday()));
    }

    #[test]
    fn unsorted_and_repeated_minutes() {
        let schedule = schedule_with("8 30 10 30\n8 20");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 8, 0, 0), 5).unwrap();
        assert_eq!(hhmm(&result), vec!["08:10", "08:20", "08:30"]);
    }

    #[test]
    fn hours_past_23_are_never_reached() {
        let schedule = schedule_with("24 10\n25 0");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 0, 0, 0), 3).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn count_limits_result() {
        let schedule = schedule_with("8 0 10 20 30 40 50");
        let now = at(monday(), 7, 0, 0);
        assert_eq!(find_departures(&schedule, "A站", "北方向", now, 1).unwrap().len(), 1);
        assert_eq!(find_departures(&schedule, "A站", "北方向", now, 4).unwrap().len(), 4);
        assert!(find_departures(&schedule, "A站", "北方向", now, 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_station_and_direction() {
        let schedule = schedule_with("8 0");
        let now = at(monday(), 7, 0, 0);

        assert_eq!(
            find_departures(&schedule, "B站", "北方向", now, 3),
            Err(NoService::UnknownStation("B站".to_string()))
        );
        assert!(matches!(
            find_departures(&schedule, "A站", "南方向", now, 3),
            Err(NoService::UnknownDirection { .. })
        ));
        assert!(next_departures(&schedule, "B站", "北方向", now, 3).is_empty());
    }

    #[test]
    fn weekend_label_does_not_match_tuesday() {
        let schedule = parse_timetable("A站\n北方向\n周六日\n8 0 30\n");
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let now = at(tuesday, 7, 0, 0);

        assert_eq!(
            find_departures(&schedule, "A站", "北方向", now, 3),
            Err(NoService::NoMatchingWeekdaySet {
                station: "A站".to_string(),
                direction: "北方向".to_string(),
                weekday: "周二",
            })
        );
        assert!(next_departures(&schedule, "A站", "北方向", now, 3).is_empty());
    }

    #[test]
    fn weekday_table_is_chosen_by_now_not_by_departure_day() {
        // Friday's table is used for Saturday-morning departures after midnight
        let schedule =
            parse_timetable("A站\n北方向\n周五\n23 30\n0 15\n周六\n0 45\n");
        let friday = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let result = find_departures(&schedule, "A站", "北方向", at(friday, 23, 40, 0), 3).unwrap();

        assert_eq!(hhmm(&result), vec!["00:15"]);
        assert_eq!(result[0].date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn first_matching_label_wins() {
        let schedule = parse_timetable("A站\n北方向\n周一周二\n8 0\n周一\n9 0\n");
        let result = find_departures(&schedule, "A站", "北方向", at(monday(), 7, 0, 0), 3).unwrap();
        assert_eq!(hhmm(&result), vec!["08:00"]);
    }

    #[test]
    fn error_display() {
        let err = NoService::UnknownStation("B站".into());
        assert_eq!(err.to_string(), "unknown station: B站");

        let err = NoService::UnknownDirection {
            station: "A站".into(),
            direction: "南方向".into(),
        };
        assert_eq!(err.to_string(), "unknown direction 南方向 at A站");

        let err = NoService::NoMatchingWeekdaySet {
            station: "A站".into(),
            direction: "北方向".into(),
            weekday: "周二",
        };
        assert_eq!(err.to_string(), "no timetable for A站 北方向 on 周二");
    }
}
