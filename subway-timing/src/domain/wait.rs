//! Time remaining until a departure.

use std::fmt;

use chrono::{Duration, NaiveDateTime};

/// Whole seconds between a reference time and a departure.
///
/// The displayed minute count is floored; threshold decisions use the
/// second count so they don't flip back and forth near a minute boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaitTime {
    seconds: i64,
}

impl WaitTime {
    /// Create a wait time from a second count.
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Wait from `now` until `departure`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use subway_timing::domain::WaitTime;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let now = date.and_hms_opt(8, 10, 30).unwrap();
    /// let departure = date.and_hms_opt(8, 15, 0).unwrap();
    ///
    /// let wait = WaitTime::between(now, departure);
    /// assert_eq!(wait.seconds(), 270);
    /// assert_eq!(wait.minutes(), 4);
    /// ```
    pub fn between(now: NaiveDateTime, departure: NaiveDateTime) -> Self {
        Self::from_duration(departure.signed_duration_since(now))
    }

    /// Create a wait time from a duration, dropping sub-second precision.
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            seconds: duration.num_seconds(),
        }
    }

    /// Whole seconds.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Whole minutes, rounded down.
    pub fn minutes(&self) -> i64 {
        self.seconds.div_euclid(60)
    }

    /// Headline text for the first departure.
    ///
    /// ```
    /// use subway_timing::domain::WaitTime;
    ///
    /// assert_eq!(WaitTime::from_seconds(45).friendly(), "即将到站");
    /// assert_eq!(WaitTime::from_seconds(90).friendly(), "1分钟后到站");
    /// assert_eq!(WaitTime::from_seconds(600).friendly(), "10分钟后到站");
    /// ```
    pub fn friendly(&self) -> String {
        match self.minutes() {
            m if m < 1 => "即将到站".to_string(),
            1 => "1分钟后到站".to_string(),
            m => format!("{m}分钟后到站"),
        }
    }
}

impl fmt::Debug for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaitTime({}s)", self.seconds)
    }
}

/// Short form used for each listed departure, e.g. `4 分钟`.
impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 分钟", self.minutes())
    }
}
