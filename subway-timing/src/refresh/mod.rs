//! Keeping sensors up to date.
//!
//! Each configured route gets a [`RefreshLoop`] that publishes a
//! [`BoardState`] and reschedules itself according to an
//! [`UpdatePolicy`]. Loops talk to their runtime through the [`Host`]
//! trait; [`run_refresh`] drives them on tokio.

mod board;
mod host;
mod policy;
mod refresh_loop;
mod tokio_host;

#[cfg(test)]
mod loop_tests;

pub use board::{BoardAttributes, BoardState, NO_SERVICE_STATE, NO_SERVICE_TEXT, SensorState, TrainInfo};
pub use host::Host;
pub use policy::{
    DEFAULT_FIXED_INTERVAL_SECS, DISTANT_POLL_SECS, FixedInterval, MAX_FIXED_INTERVAL_SECS,
    MIN_FIXED_INTERVAL_SECS, NO_SERVICE_POLL_SECS, UpdateMode, UpdatePolicy, next_poll_seconds,
};
pub use refresh_loop::RefreshLoop;
pub use tokio_host::{TokioHost, run_refresh};
