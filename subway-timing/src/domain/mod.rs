//! Domain types for the subway timetable.
//!
//! Labels read from the timetable document are free text; these types keep
//! them apart so a station name can't be passed where a direction is
//! expected.

mod labels;
mod route;
mod wait;
mod weekday;

pub use labels::{DirectionLabel, StationName, WeekdaySetLabel};
pub use route::Route;
pub use wait::WaitTime;
pub use weekday::{WEEKDAY_NAMES, canonical_name};
