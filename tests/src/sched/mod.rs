//! Scheduler Test Suite
//!
//! Exercises the virtual-time scheduler through its public API only. This
//! module includes:
//! - Construction and misuse handling
//! - Single-group rotation and idle transitions
//! - The four-class reference workload and its switching pattern
//! - Voluntary yields and mid-slice switches
//! - Virtual-time accrual, carry precision and re-seeding
//! - Tie breaking, warp latency credit and timeout clamping
//! - Readiness changes while the affected context is current
//! - Introspection accessors and the state dump

mod tie_break;

use crate::mock::MockTimer;
use crate::scheduler::{ContextId, GroupConfig, GroupId, Scheduler, SchedulerConfig};
use crate::timer::Ticks;

/// Timeout bounds shared by the whole suite. These are the crate defaults;
/// spelled out here so the arithmetic in the expected values is checkable
/// by hand.
pub const MIN_TIMEOUT: Ticks = 500;
pub const MAX_TIMEOUT: Ticks = 100_000;

pub fn suite_config() -> SchedulerConfig {
    SchedulerConfig {
        min_timeout: MIN_TIMEOUT,
        max_timeout: MAX_TIMEOUT,
    }
}

pub fn new_sched(groups: &[GroupConfig]) -> Scheduler<MockTimer> {
    Scheduler::new(MockTimer::new(), groups, suite_config()).expect("scheduler construction")
}

/// The reference four-class configuration: two latency-sensitive groups
/// with warp credit, one interactive group, one batch group.
pub fn four_classes() -> [GroupConfig; 4] {
    [
        GroupConfig::new("driver", 2, 400),
        GroupConfig::new("multimedia", 3, 200),
        GroupConfig::new("app", 2, 100),
        GroupConfig::new("background", 1, 0),
    ]
}

/// A scheduler over the four reference classes with one ready context per
/// class. Context ids come back in declaration order.
pub fn four_class_sched() -> (Scheduler<MockTimer>, [ContextId; 4]) {
    let mut sched = new_sched(&four_classes());
    let mut ids = [ContextId::IDLE; 4];
    for (index, id) in ids.iter_mut().enumerate() {
        *id = sched
            .add_context(GroupId::new(index))
            .expect("context creation");
    }
    for id in ids {
        sched.ready(id);
    }
    (sched, ids)
}

/// Advance the clock to `now`, reschedule, and check both outputs of the
/// decision. Dumps the whole scheduler before panicking so a failing
/// sequence can be reconstructed from the test log.
pub fn step(
    sched: &mut Scheduler<MockTimer>,
    now: Ticks,
    want_current: ContextId,
    want_deadline: Ticks,
) {
    sched.timer_mut().advance_to(now);
    sched.update();
    let got_current = sched.current();
    let got_deadline = sched.timer().armed_deadline();
    if got_current != want_current || got_deadline != want_deadline {
        eprintln!("{}", sched);
        panic!(
            "update at t={}: got ctx {} deadline {}, want ctx {} deadline {}",
            now,
            got_current.index(),
            got_deadline,
            want_current.index(),
            want_deadline
        );
    }
}

/// Collect a group's ready list front-to-back.
pub fn ready_order(sched: &Scheduler<MockTimer>, group: GroupId) -> Vec<ContextId> {
    let mut order = Vec::new();
    sched.for_each_ready(group, |id| order.push(id));
    order
}
