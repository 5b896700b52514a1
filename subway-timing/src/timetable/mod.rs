//! Timetable documents: line classification, parsing and the schedule store.
//!
//! A timetable is plain UTF-8 text:
//!
//! ```text
//! // comment
//! 人民广场                <- station
//! 往莘庄方向              <- direction (contains 方向)
//! 周一周二周三周四周五    <- weekday set (starts with 周)
//! 小时 | 分钟             <- header, ignored
//! 8 0 15 30               <- hour, then minutes
//! ```

mod error;
mod line;
mod parser;
mod schedule;
mod source;

pub use error::{LoadError, ParseError};
pub use line::{
    COMMENT_MARKER, DIRECTION_MARKER, HEADER_PREFIX, HourRow, Line, WEEKDAY_MARKER, classify,
};
pub use parser::{parse_timetable, try_parse_timetable};
pub use schedule::{DayTimetable, DirectionTimetable, Schedule, StationTimetable};
pub use source::{DEFAULT_CONFIG_PATH, TimetableSource};
