//! Per-route refresh loop.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset};
use tracing::debug;

use crate::departures::{DEFAULT_DEPARTURE_COUNT, next_departures};
use crate::domain::Route;
use crate::timetable::Schedule;

use super::board::BoardState;
use super::host::Host;
use super::policy::UpdatePolicy;

/// Keeps one route's board up to date.
///
/// Each refresh recomputes the board, publishes it, and schedules the
/// next refresh according to the [`UpdatePolicy`]. At most one timer is
/// pending per loop at any time.
pub struct RefreshLoop<T> {
    schedule: Arc<Schedule>,
    route: Route,
    policy: UpdatePolicy,
    count: usize,
    pending: Option<T>,
}

impl<T> RefreshLoop<T> {
    /// Create an idle loop.
    pub fn new(schedule: Arc<Schedule>, route: Route, policy: UpdatePolicy) -> Self {
        Self {
            schedule,
            route,
            policy,
            count: DEFAULT_DEPARTURE_COUNT,
            pending: None,
        }
    }

    /// Show this many upcoming departures instead of the default three.
    pub fn with_departure_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// The route this loop publishes for.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// How this loop picks its next refresh time.
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Whether a refresh is pending.
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// The board as it would be published at `now`.
    pub fn snapshot(&self, now: DateTime<FixedOffset>) -> BoardState {
        let departures = next_departures(
            &self.schedule,
            self.route.station.as_str(),
            self.route.direction.as_str(),
            now.naive_local(),
            self.count,
        );
        BoardState::build(&self.route, &departures, now)
    }

    /// Start the loop: publish immediately and schedule the next refresh.
    ///
    /// Attaching a loop that is already running restarts it.
    pub fn attach<H: Host<Timer = T>>(&mut self, host: &mut H) -> BoardState {
        self.refresh(host)
    }

    /// A timer fired: republish and reschedule.
    pub fn on_timer<H: Host<Timer = T>>(&mut self, host: &mut H) -> BoardState {
        self.refresh(host)
    }

    /// Stop the loop, cancelling any pending refresh.
    pub fn detach<H: Host<Timer = T>>(&mut self, host: &mut H) {
        if let Some(timer) = self.pending.take() {
            host.cancel(timer);
            debug!(route = %self.route, "refresh loop detached");
        }
    }

    fn refresh<H: Host<Timer = T>>(&mut self, host: &mut H) -> BoardState {
        if let Some(timer) = self.pending.take() {
            host.cancel(timer);
        }

        let now = host.now();
        let board = self.snapshot(now);
        host.publish(&self.route, &board);

        let poll = self.policy.poll_seconds(board.next_wait());
        let when = now + Duration::seconds(poll as i64);
        self.pending = Some(host.schedule_at(when));

        debug!(
            route = %self.route,
            state = %board.state,
            poll_secs = poll,
            next_refresh = %when,
            "refresh scheduled"
        );
        board
    }
}
