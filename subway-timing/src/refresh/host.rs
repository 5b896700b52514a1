//! The seam between refresh loops and whatever runs them.

use chrono::{DateTime, FixedOffset};

use crate::domain::Route;

use super::board::BoardState;

/// What a refresh loop needs from its runtime: a wall clock, one-shot
/// timers, and somewhere to publish state.
///
/// The production implementation is [`TokioHost`](super::TokioHost);
/// tests drive loops with a hand-cranked host instead.
pub trait Host {
    /// Handle to a pending timer.
    type Timer;

    /// Local wall-clock time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Arrange for the loop's `on_timer` to be called at `when`.
    fn schedule_at(&mut self, when: DateTime<FixedOffset>) -> Self::Timer;

    /// Cancel a pending timer. Cancelling one that already fired is a no-op.
    fn cancel(&mut self, timer: Self::Timer);

    /// Publish new state for a route.
    fn publish(&mut self, route: &Route, state: &BoardState);
}
