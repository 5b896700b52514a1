//! The parsed timetable: station → direction → weekday set → hour → minutes.
//!
//! Every level keeps the order in which entries first appeared in the
//! document. Weekday-set lookup depends on that order: the first label that
//! covers the day wins.

use std::collections::BTreeMap;

use chrono::Weekday;

use crate::domain::{DirectionLabel, Route, StationName, WeekdaySetLabel};

/// A full timetable document.
///
/// Built once by the parser and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    stations: Vec<StationTimetable>,
}

/// All directions served at one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationTimetable {
    name: StationName,
    directions: Vec<DirectionTimetable>,
}

/// All weekday sets for one direction at one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionTimetable {
    label: DirectionLabel,
    day_sets: Vec<DayTimetable>,
}

/// Hour table for one weekday set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTimetable {
    label: WeekdaySetLabel,
    /// Minutes in document order; not sorted, may repeat.
    hours: BTreeMap<u32, Vec<u32>>,
}

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no station was found.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Stations in document order.
    pub fn stations(&self) -> impl Iterator<Item = &StationTimetable> {
        self.stations.iter()
    }

    /// Look up a station by name.
    pub fn station(&self, name: &str) -> Option<&StationTimetable> {
        self.stations.iter().find(|s| s.name.as_str() == name)
    }

    /// Look up a direction at a station.
    pub fn direction(&self, station: &str, direction: &str) -> Option<&DirectionTimetable> {
        self.station(station)?.direction(direction)
    }

    /// Directions served at a station, in document order.
    ///
    /// Empty if the station is unknown.
    pub fn directions(&self, station: &str) -> Vec<&DirectionLabel> {
        self.station(station)
            .map(|s| s.directions().map(|d| d.label()).collect())
            .unwrap_or_default()
    }

    /// Whether the schedule has this station/direction pair.
    pub fn contains_route(&self, station: &str, direction: &str) -> bool {
        self.direction(station, direction).is_some()
    }

    /// Every station/direction pair, in document order.
    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.stations.iter().flat_map(|station| {
            station
                .directions
                .iter()
                .map(move |d| Route::new(station.name.clone(), d.label.clone()))
        })
    }

    /// Open a station, reusing it if the name was seen before.
    ///
    /// Returns the station's index.
    pub(super) fn open_station(&mut self, name: &str) -> usize {
        if let Some(idx) = self.stations.iter().position(|s| s.name.as_str() == name) {
            return idx;
        }
        self.stations.push(StationTimetable {
            name: StationName::new(name),
            directions: Vec::new(),
        });
        self.stations.len() - 1
    }

    /// Open a direction under a station, reusing it if seen before.
    pub(super) fn open_direction(&mut self, station: usize, label: &str) -> usize {
        if let Some(idx) = self.find_direction(station, label) {
            return idx;
        }
        let directions = &mut self.stations[station].directions;
        directions.push(DirectionTimetable {
            label: DirectionLabel::new(label),
            day_sets: Vec::new(),
        });
        directions.len() - 1
    }

    /// Open a weekday set under a direction, reusing it if seen before.
    pub(super) fn open_day_set(&mut self, station: usize, direction: usize, label: &str) -> usize {
        if let Some(idx) = self.find_day_set(station, direction, label) {
            return idx;
        }
        let day_sets = &mut self.stations[station].directions[direction].day_sets;
        day_sets.push(DayTimetable {
            label: WeekdaySetLabel::new(label),
            hours: BTreeMap::new(),
        });
        day_sets.len() - 1
    }

    /// Index of a direction under a station, if it exists.
    pub(super) fn find_direction(&self, station: usize, label: &str) -> Option<usize> {
        self.stations
            .get(station)?
            .directions
            .iter()
            .position(|d| d.label.as_str() == label)
    }

    /// Index of a weekday set under a direction, if it exists.
    pub(super) fn find_day_set(&self, station: usize, direction: usize, label: &str) -> Option<usize> {
        self.stations
            .get(station)?
            .directions
            .get(direction)?
            .day_sets
            .iter()
            .position(|d| d.label.as_str() == label)
    }

    /// Append minutes to an hour, creating the hour if needed.
    pub(super) fn append_minutes(
        &mut self,
        (station, direction, day_set): (usize, usize, usize),
        hour: u32,
        minutes: &[u32],
    ) {
        self.stations[station].directions[direction].day_sets[day_set]
            .hours
            .entry(hour)
            .or_default()
            .extend_from_slice(minutes);
    }
}

impl StationTimetable {
    /// Station name.
    pub fn name(&self) -> &StationName {
        &self.name
    }

    /// Directions in document order.
    pub fn directions(&self) -> impl Iterator<Item = &DirectionTimetable> {
        self.directions.iter()
    }

    /// Look up a direction by label.
    pub fn direction(&self, label: &str) -> Option<&DirectionTimetable> {
        self.directions.iter().find(|d| d.label.as_str() == label)
    }
}

impl DirectionTimetable {
    /// Direction label.
    pub fn label(&self) -> &DirectionLabel {
        &self.label
    }

    /// Weekday sets in document order.
    pub fn day_sets(&self) -> impl Iterator<Item = &DayTimetable> {
        self.day_sets.iter()
    }

    /// The first weekday set (in document order) whose label names `day`.
    pub fn day_set_for(&self, day: Weekday) -> Option<&DayTimetable> {
        self.day_sets.iter().find(|d| d.label.covers(day))
    }
}

impl DayTimetable {
    /// Weekday-set label.
    pub fn label(&self) -> &WeekdaySetLabel {
        &self.label
    }

    /// Minutes listed for an hour, in document order.
    ///
    /// Empty if the hour has no row.
    pub fn minutes(&self, hour: u32) -> &[u32] {
        self.hours.get(&hour).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Minutes for an hour, ascending and without repeats.
    pub fn sorted_minutes(&self, hour: u32) -> Vec<u32> {
        let mut minutes = self.minutes(hour).to_vec();
        minutes.sort_unstable();
        minutes.dedup();
        minutes
    }

    /// Hours that have a row, ascending.
    pub fn hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.hours.keys().copied()
    }

    /// Total number of listed departures.
    pub fn departure_count(&self) -> usize {
        self.hours.values().map(|v| v.len()).sum()
    }
}
