//! Subway departure countdowns.
//!
//! Reads a plain-text metro timetable and answers: "how long until the
//! next train from this station in this direction?" Each configured
//! route becomes a sensor that refreshes itself, faster as the next
//! departure approaches.

pub mod config;
pub mod departures;
pub mod domain;
pub mod refresh;
pub mod timetable;
