//! Next-departure calculator.
//!
//! Answers "what are the next few departures from this station in this
//! direction?" for a reference time, looking at most 24 hours ahead.

mod next;

pub use next::{DEFAULT_DEPARTURE_COUNT, NoService, find_departures, next_departures};
