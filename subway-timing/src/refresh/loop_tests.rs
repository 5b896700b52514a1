//! Refresh loop tests, driven by a hand-cranked host.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};

use super::*;
use crate::domain::{DirectionLabel, Route, StationName};
use crate::timetable::{Schedule, parse_timetable};

const DOC: &str = "\
人民广场
往莘庄方向
周一周二周三周四周五
小时 | 分钟
8 0 15 30 45
23 50
周六周日
9 0
";

/// Host whose clock only moves when a test fires a timer.
struct ManualHost {
    now: DateTime<FixedOffset>,
    next_id: u32,
    pending: Vec<(u32, DateTime<FixedOffset>)>,
    cancelled: Vec<u32>,
    published: Vec<(Route, BoardState)>,
}

impl ManualHost {
    fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            next_id: 0,
            pending: Vec::new(),
            cancelled: Vec::new(),
            published: Vec::new(),
        }
    }

    /// Remove the earliest pending timer and move the clock to it.
    fn fire_next(&mut self) -> Option<u32> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, when))| *when)
            .map(|(i, _)| i)?;
        let (id, when) = self.pending.remove(idx);
        self.now = when;
        Some(id)
    }

    fn last_state(&self) -> &BoardState {
        &self.published.last().unwrap().1
    }
}

impl Host for ManualHost {
    type Timer = u32;

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn schedule_at(&mut self, when: DateTime<FixedOffset>) -> u32 {
        self.next_id += 1;
        self.pending.push((self.next_id, when));
        self.next_id
    }

    fn cancel(&mut self, timer: u32) {
        self.pending.retain(|(id, _)| *id != timer);
        self.cancelled.push(timer);
    }

    fn publish(&mut self, route: &Route, state: &BoardState) {
        self.published.push((route.clone(), state.clone()));
    }
}

// 2024-03-11 is a Monday, in UTC+8
fn monday(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(2024, 3, 11)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
        .and_local_timezone(FixedOffset::east_opt(8 * 3600).unwrap())
        .unwrap()
}

fn schedule() -> Arc<Schedule> {
    Arc::new(parse_timetable(DOC))
}

fn route(station: &str, direction: &str) -> Route {
    Route::new(StationName::new(station), DirectionLabel::new(direction))
}

fn xinzhuang() -> Route {
    route("人民广场", "往莘庄方向")
}

#[test]
fn attach_publishes_and_schedules_once() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);

    assert!(!lp.is_scheduled());
    let board = lp.attach(&mut host);

    assert_eq!(board.state, SensorState::Minutes(4));
    assert_eq!(host.published.len(), 1);
    assert_eq!(host.published[0].0, xinzhuang());
    // 270s to the 08:15 train polls every 30s
    assert_eq!(host.pending, vec![(1, monday(8, 11, 0))]);
    assert!(lp.is_scheduled());
}

#[test]
fn timer_replaces_pending_refresh() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);
    lp.attach(&mut host);

    for _ in 0..20 {
        assert_eq!(host.pending.len(), 1);
        host.fire_next();
        lp.on_timer(&mut host);
        assert_eq!(host.pending.len(), 1);
    }
    assert_eq!(host.published.len(), 21);
}

#[test]
fn reattach_cancels_previous_timer() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);
    lp.attach(&mut host);
    lp.attach(&mut host);

    assert_eq!(host.cancelled, vec![1]);
    assert_eq!(host.pending.len(), 1);
    assert_eq!(host.pending[0].0, 2);
}

#[test]
fn detach_cancels_pending_refresh() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);
    lp.attach(&mut host);
    lp.detach(&mut host);

    assert!(!lp.is_scheduled());
    assert!(host.pending.is_empty());
    assert_eq!(host.cancelled, vec![1]);

    // Detaching twice is harmless
    lp.detach(&mut host);
    assert_eq!(host.cancelled, vec![1]);
}

#[test]
fn unknown_route_polls_slowly() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), route("徐家汇", "往江苏路方向"), UpdatePolicy::Dynamic);
    let board = lp.attach(&mut host);

    assert_eq!(board.state, SensorState::NoService);
    assert_eq!(host.pending, vec![(1, monday(8, 20, 30))]);
}

#[test]
fn fixed_policy_ignores_wait() {
    let interval = FixedInterval::new(45).unwrap();
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Fixed(interval));
    lp.attach(&mut host);

    assert_eq!(host.pending, vec![(1, monday(8, 11, 15))]);
}

#[test]
fn countdown_follows_the_clock() {
    let mut host = ManualHost::new(monday(8, 10, 30));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);
    lp.attach(&mut host);

    // 08:11:00, 08:11:30, ... until the 08:15 train is under a minute away
    while host.now < monday(8, 14, 10) {
        host.fire_next();
        lp.on_timer(&mut host);
    }
    assert_eq!(host.last_state().attributes.friendly_wait_time, "即将到站");
}

#[test]
fn runs_across_midnight() {
    let mut host = ManualHost::new(monday(23, 45, 0));
    let mut lp = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic)
        .with_departure_count(1);
    lp.attach(&mut host);

    let first = host.last_state().clone();
    assert_eq!(first.state, SensorState::Minutes(5));

    while host.now < monday(23, 55, 0) {
        host.fire_next();
        lp.on_timer(&mut host);
    }

    // Next weekday departure is Tuesday 08:00
    let after = host.last_state();
    assert_eq!(after.attributes.next_trains.len(), 1);
    assert_eq!(after.attributes.next_trains[0].departure_time, "08:00");
    assert_eq!(host.pending.len(), 1);
}

#[test]
fn snapshot_does_not_touch_the_host() {
    let lp: RefreshLoop<u32> = RefreshLoop::new(schedule(), xinzhuang(), UpdatePolicy::Dynamic);
    let board = lp.snapshot(monday(8, 40, 0));

    assert_eq!(board.state, SensorState::Minutes(5));
    assert!(!lp.is_scheduled());
    assert_eq!(lp.route(), &xinzhuang());
    assert_eq!(lp.policy(), UpdatePolicy::Dynamic);
}
