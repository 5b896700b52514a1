//! How soon to refresh a sensor.
//!
//! The closer the next departure, the more often the countdown is
//! refreshed.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::domain::WaitTime;

/// Poll interval when nothing is scheduled.
pub const NO_SERVICE_POLL_SECS: u64 = 600;

/// Poll interval when the next departure is at least half an hour away.
pub const DISTANT_POLL_SECS: u64 = 300;

/// (wait below this many seconds, poll every this many seconds)
const POLL_STEPS: [(i64, u64); 4] = [(60, 10), (300, 30), (900, 60), (1800, 120)];

/// Seconds until the next poll, given seconds until the next departure.
///
/// # Examples
///
/// ```
/// use subway_timing::refresh::next_poll_seconds;
///
/// assert_eq!(next_poll_seconds(None), 600);
/// assert_eq!(next_poll_seconds(Some(59)), 10);
/// assert_eq!(next_poll_seconds(Some(60)), 30);
/// assert_eq!(next_poll_seconds(Some(3600)), 300);
/// ```
pub fn next_poll_seconds(wait_secs: Option<i64>) -> u64 {
    let Some(wait) = wait_secs else {
        return NO_SERVICE_POLL_SECS;
    };
    POLL_STEPS
        .iter()
        .find(|(below, _)| wait < *below)
        .map(|(_, poll)| *poll)
        .unwrap_or(DISTANT_POLL_SECS)
}

/// Smallest accepted fixed interval, in seconds.
pub const MIN_FIXED_INTERVAL_SECS: u64 = 10;

/// Largest accepted fixed interval, in seconds.
pub const MAX_FIXED_INTERVAL_SECS: u64 = 600;

/// Default fixed interval, in seconds.
pub const DEFAULT_FIXED_INTERVAL_SECS: u64 = 60;

/// A fixed poll interval between 10 and 600 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedInterval(u64);

impl FixedInterval {
    /// Validate an interval in seconds.
    pub fn new(secs: u64) -> Result<Self, ConfigError> {
        if !(MIN_FIXED_INTERVAL_SECS..=MAX_FIXED_INTERVAL_SECS).contains(&secs) {
            return Err(ConfigError::InvalidInterval(secs));
        }
        Ok(Self(secs))
    }

    /// The interval in seconds.
    pub fn secs(&self) -> u64 {
        self.0
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self(DEFAULT_FIXED_INTERVAL_SECS)
    }
}

/// How a sensor picks its next refresh time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Refresh faster as the next departure approaches.
    #[default]
    Dynamic,
    /// Refresh on a fixed interval.
    Fixed(FixedInterval),
}

impl UpdatePolicy {
    /// Seconds until the next refresh, given the wait for the next departure.
    pub fn poll_seconds(&self, next_wait: Option<WaitTime>) -> u64 {
        match self {
            UpdatePolicy::Dynamic => next_poll_seconds(next_wait.map(|w| w.seconds())),
            UpdatePolicy::Fixed(interval) => interval.secs(),
        }
    }

    /// The mode name, without the interval.
    pub fn mode(&self) -> UpdateMode {
        match self {
            UpdatePolicy::Dynamic => UpdateMode::Dynamic,
            UpdatePolicy::Fixed(_) => UpdateMode::Fixed,
        }
    }
}

/// Update mode as it appears in configuration: `dynamic` or `fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    #[default]
    Dynamic,
    Fixed,
}

impl UpdateMode {
    /// Combine with an interval (used only by `Fixed`).
    pub fn with_interval(self, interval: FixedInterval) -> UpdatePolicy {
        match self {
            UpdateMode::Dynamic => UpdatePolicy::Dynamic,
            UpdateMode::Fixed => UpdatePolicy::Fixed(interval),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Dynamic => "dynamic",
            UpdateMode::Fixed => "fixed",
        }
    }
}

impl FromStr for UpdateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dynamic" => Ok(UpdateMode::Dynamic),
            "fixed" => Ok(UpdateMode::Fixed),
            other => Err(ConfigError::InvalidUpdateMode(other.to_string())),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
