//! Running refresh loops on the tokio runtime.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::domain::Route;
use crate::timetable::Schedule;

use super::board::BoardState;
use super::host::Host;
use super::policy::UpdatePolicy;
use super::refresh_loop::RefreshLoop;

/// A [`Host`] backed by the local clock and tokio timers.
///
/// Each timer is a spawned task that sleeps, then sends the host's id
/// down a channel; the driver calls the matching loop's `on_timer`.
pub struct TokioHost<P> {
    id: usize,
    ticks: mpsc::UnboundedSender<usize>,
    publish: P,
}

impl<P> TokioHost<P>
where
    P: FnMut(&Route, &BoardState),
{
    pub fn new(id: usize, ticks: mpsc::UnboundedSender<usize>, publish: P) -> Self {
        Self { id, ticks, publish }
    }
}

impl<P> Host for TokioHost<P>
where
    P: FnMut(&Route, &BoardState),
{
    type Timer = AbortHandle;

    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn schedule_at(&mut self, when: DateTime<FixedOffset>) -> AbortHandle {
        // A time already in the past fires immediately
        let delay = (when - self.now()).to_std().unwrap_or_default();
        let ticks = self.ticks.clone();
        let id = self.id;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The driver may already have shut down
            let _ = ticks.send(id);
        })
        .abort_handle()
    }

    fn cancel(&mut self, timer: AbortHandle) {
        timer.abort();
    }

    fn publish(&mut self, route: &Route, state: &BoardState) {
        (self.publish)(route, state);
    }
}

/// Run one refresh loop per route until `shutdown` completes.
///
/// Every route publishes once straight away. On shutdown all pending
/// timers are cancelled.
pub async fn run_refresh<P, F>(
    schedule: Arc<Schedule>,
    routes: Vec<Route>,
    policy: UpdatePolicy,
    publish: P,
    shutdown: F,
) where
    P: FnMut(&Route, &BoardState) + Clone,
    F: Future<Output = ()>,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut sensors: Vec<(RefreshLoop<AbortHandle>, TokioHost<P>)> = routes
        .into_iter()
        .enumerate()
        .map(|(id, route)| {
            (
                RefreshLoop::new(Arc::clone(&schedule), route, policy),
                TokioHost::new(id, tx.clone(), publish.clone()),
            )
        })
        .collect();
    drop(tx);

    for (refresh, host) in sensors.iter_mut() {
        refresh.attach(host);
    }
    info!(sensors = sensors.len(), mode = %policy.mode(), "refresh loops started");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            tick = rx.recv() => match tick {
                Some(id) => {
                    if let Some((refresh, host)) = sensors.get_mut(id) {
                        refresh.on_timer(host);
                    }
                }
                None => break,
            },
        }
    }

    for (refresh, host) in sensors.iter_mut() {
        refresh.detach(host);
    }
    debug!("refresh loops stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DirectionLabel, StationName};
    use crate::refresh::SensorState;
    use crate::timetable::parse_timetable;
    use std::sync::Mutex;
    use std::time::Duration;

    fn route(station: &str, direction: &str) -> Route {
        Route::new(StationName::new(station), DirectionLabel::new(direction))
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_until_shutdown() {
        // Nothing in the timetable, so every loop polls every 600s
        let schedule = Arc::new(parse_timetable("人民广场\n往莘庄方向\n"));
        let published = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&published);

        run_refresh(
            schedule,
            vec![route("人民广场", "往莘庄方向"), route("徐家汇", "往江苏路方向")],
            UpdatePolicy::Dynamic,
            move |route: &Route, board: &BoardState| {
                log.lock().unwrap().push((route.to_string(), board.state));
            },
            tokio::time::sleep(Duration::from_secs(1250)),
        )
        .await;

        let seen = published.lock().unwrap().clone();
        // t=0, ~600, ~1200 for each of the two routes
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|(_, state)| *state == SensorState::NoService));
        assert_eq!(
            seen.iter().filter(|(r, _)| r == "徐家汇 往江苏路方向").count(),
            3
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers() {
        let schedule = Arc::new(parse_timetable(""));
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);

        run_refresh(
            schedule,
            vec![route("人民广场", "往莘庄方向")],
            UpdatePolicy::Dynamic,
            move |_: &Route, _: &BoardState| {
                *counter.lock().unwrap() += 1;
            },
            std::future::ready(()),
        )
        .await;

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_routes_returns_on_shutdown() {
        run_refresh(
            Arc::new(parse_timetable("")),
            Vec::new(),
            UpdatePolicy::Dynamic,
            |_: &Route, _: &BoardState| {},
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;
    }
}
