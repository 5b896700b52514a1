//! The state a sensor publishes for a route.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::{Route, WaitTime};

/// State shown when nothing departs in the next 24 hours.
pub const NO_SERVICE_STATE: &str = "无班次";

/// Headline shown when nothing departs in the next 24 hours.
pub const NO_SERVICE_TEXT: &str = "暂无班次";

/// How many departures get their own flattened attributes.
const FLATTENED_TRAINS: usize = 3;

/// The sensor's main value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    /// Whole minutes until the next departure.
    Minutes(i64),
    /// No upcoming departure.
    NoService,
}

impl Serialize for SensorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SensorState::Minutes(m) => serializer.serialize_i64(*m),
            SensorState::NoService => serializer.serialize_str(NO_SERVICE_STATE),
        }
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Minutes(m) => write!(f, "{m}"),
            SensorState::NoService => f.write_str(NO_SERVICE_STATE),
        }
    }
}

/// One upcoming departure as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainInfo {
    /// Clock time, `HH:MM`.
    pub departure_time: String,
    /// Whole minutes to wait, e.g. `4 分钟`.
    pub wait_time: String,
}

/// Attributes published alongside the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardAttributes {
    pub station: String,
    pub direction: String,
    pub friendly_wait_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_train: Option<TrainInfo>,
    pub next_trains: Vec<TrainInfo>,
    pub last_updated: String,
}

/// Everything a sensor publishes for one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub state: SensorState,
    pub attributes: BoardAttributes,
    next_wait: Option<WaitTime>,
}

impl BoardState {
    /// Build the board for a route from its upcoming departures.
    ///
    /// `departures` are local wall-clock times and must be ascending; the
    /// first one drives the state.
    pub fn build(
        route: &Route,
        departures: &[NaiveDateTime],
        now: DateTime<FixedOffset>,
    ) -> Self {
        let local = now.naive_local();
        let next_trains: Vec<TrainInfo> = departures
            .iter()
            .map(|t| TrainInfo {
                departure_time: t.format("%H:%M").to_string(),
                wait_time: WaitTime::between(local, *t).to_string(),
            })
            .collect();

        let next_wait = departures.first().map(|t| WaitTime::between(local, *t));
        let (state, friendly_wait_time) = match next_wait {
            Some(wait) => (SensorState::Minutes(wait.minutes()), wait.friendly()),
            None => (SensorState::NoService, NO_SERVICE_TEXT.to_string()),
        };

        Self {
            state,
            attributes: BoardAttributes {
                station: route.station.to_string(),
                direction: route.direction.to_string(),
                friendly_wait_time,
                next_train: next_trains.first().cloned(),
                next_trains,
                last_updated: now.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            },
            next_wait,
        }
    }

    /// Wait until the first departure, if any.
    pub fn next_wait(&self) -> Option<WaitTime> {
        self.next_wait
    }

    /// Attributes as a flat JSON object.
    ///
    /// Besides the nested `next_trains` list, the first three departures
    /// are repeated as `next_train_N`, `next_train_N_time` and
    /// `next_train_N_wait` so templates can address them directly.
    pub fn attribute_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut map = match serde_json::to_value(&self.attributes)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        for (i, train) in self
            .attributes
            .next_trains
            .iter()
            .take(FLATTENED_TRAINS)
            .enumerate()
        {
            let n = i + 1;
            map.insert(format!("next_train_{n}"), serde_json::to_value(train)?);
            map.insert(
                format!("next_train_{n}_time"),
                Value::String(train.departure_time.clone()),
            );
            map.insert(
                format!("next_train_{n}_wait"),
                Value::String(train.wait_time.clone()),
            );
        }

        Ok(map)
    }
}
