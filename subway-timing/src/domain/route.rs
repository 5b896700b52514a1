//! A station/direction pair.

use std::fmt;

use super::{DirectionLabel, StationName};

/// A station and one of its directions: the unit a sensor tracks.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub station: StationName,
    pub direction: DirectionLabel,
}

impl Route {
    /// Create a new route.
    pub fn new(station: StationName, direction: DirectionLabel) -> Self {
        Self { station, direction }
    }

    /// Stable identifier for the sensor tracking this route.
    ///
    /// ```
    /// use subway_timing::domain::{DirectionLabel, Route, StationName};
    ///
    /// let route = Route::new(StationName::new("人民广场"), DirectionLabel::new("往浦东方向"));
    /// assert_eq!(route.unique_id(), "subway_timing_人民广场_往浦东方向");
    /// ```
    pub fn unique_id(&self) -> String {
        format!("subway_timing_{}_{}", self.station, self.direction)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route({} / {})", self.station, self.direction)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.station, self.direction)
    }
}
