//! Sensor configuration.

use std::path::PathBuf;

use crate::domain::{DirectionLabel, Route, StationName};
use crate::refresh::UpdatePolicy;
use crate::timetable::{DEFAULT_CONFIG_PATH, Schedule};

/// Default display-name prefix.
pub const DEFAULT_NAME: &str = "Subway Timing";

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configured station/direction pair isn't in the timetable.
    #[error("no route from {station} towards {direction} in the timetable")]
    UnknownRoute { station: String, direction: String },

    /// Fixed update interval outside 10..=600 seconds.
    #[error("update interval must be between 10 and 600 seconds, got {0}")]
    InvalidInterval(u64),

    /// Neither `dynamic` nor `fixed`.
    #[error("unknown update mode: {0:?}")]
    InvalidUpdateMode(String),
}

/// Configuration for one integration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// Prefix of each sensor's display name.
    pub name: String,

    /// Timetable document, relative to the configuration directory unless
    /// absolute.
    pub config_path: PathBuf,

    /// Restrict to one station (needs `direction` too).
    pub station: Option<StationName>,

    /// Restrict to one direction (needs `station` too).
    pub direction: Option<DirectionLabel>,

    /// How often sensors refresh.
    pub update: UpdatePolicy,
}

/// One sensor to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSpec {
    pub route: Route,
    /// `{name} {station} {direction}`
    pub name: String,
    /// `subway_timing_{station}_{direction}`
    pub unique_id: String,
}

impl SensorConfig {
    pub fn new(
        name: impl Into<String>,
        config_path: impl Into<PathBuf>,
        station: Option<StationName>,
        direction: Option<DirectionLabel>,
        update: UpdatePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            config_path: config_path.into(),
            station,
            direction,
            update,
        }
    }

    /// The single configured route, if both station and direction are set.
    pub fn route(&self) -> Option<Route> {
        match (&self.station, &self.direction) {
            (Some(station), Some(direction)) => Some(Route::new(station.clone(), direction.clone())),
            _ => None,
        }
    }

    /// Which sensors to create for a loaded timetable.
    ///
    /// A configured station/direction pair yields exactly that sensor and
    /// must exist. Otherwise every route in the timetable gets a sensor,
    /// in document order.
    pub fn select_routes(&self, schedule: &Schedule) -> Result<Vec<SensorSpec>, ConfigError> {
        let routes = match self.route() {
            Some(route) => {
                if !schedule.contains_route(route.station.as_str(), route.direction.as_str()) {
                    return Err(ConfigError::UnknownRoute {
                        station: route.station.to_string(),
                        direction: route.direction.to_string(),
                    });
                }
                vec![route]
            }
            None => schedule.routes().collect(),
        };

        Ok(routes.into_iter().map(|route| self.sensor(route)).collect())
    }

    fn sensor(&self, route: Route) -> SensorSpec {
        SensorSpec {
            name: format!("{} {}", self.name, route),
            unique_id: route.unique_id(),
            route,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            station: None,
            direction: None,
            update: UpdatePolicy::Dynamic,
        }
    }
}
