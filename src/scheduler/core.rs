//! Scheduling core.
//!
//! `Scheduler` owns the timer, the group table and the context arena and
//! implements the decision loop. Every `update()` attributes the elapsed
//! real time to whoever just ran, refreshes the virtual-time floor,
//! rotates the previous context to the back of its group, dispatches the
//! front of the group with the smallest virtual time, and programs the
//! absolute deadline at which the decision must be revisited.
//!
//! All operations are synchronous in-memory transitions; the caller (the
//! kernel's serialized event path) guarantees one call at a time.

use crate::timer::{Ticks, Timer};

use super::context::Context;
use super::group::Group;
use super::types::{
    ContextId, GroupConfig, GroupId, SchedulerConfig, SchedulerStats, VTicks, MAX_CONTEXTS,
    MAX_GROUPS,
};

const NO_GROUP: Option<Group> = None;

pub struct Scheduler<T: Timer> {
    pub(crate) timer: T,
    pub(crate) groups: [Option<Group>; MAX_GROUPS],
    pub(crate) group_count: usize,
    pub(crate) contexts: [Option<Context>; MAX_CONTEXTS],
    pub(crate) context_count: usize,
    pub(crate) current: ContextId,
    /// Minimum group vtime among groups with ready members; kept at its
    /// last value while nothing is ready so re-seeding stays anchored.
    pub(crate) min_vtime: VTicks,
    pub(crate) last_update: Ticks,
    pub(crate) yield_requested: bool,
    pub(crate) need_resched: bool,
    pub(crate) config: SchedulerConfig,
    pub(crate) stats: SchedulerStats,
}

impl<T: Timer> Scheduler<T> {
    /// Build a scheduler over a fixed set of groups. The idle context is
    /// created here and is current until something becomes ready.
    pub fn new(
        timer: T,
        groups: &[GroupConfig],
        config: SchedulerConfig,
    ) -> Result<Self, &'static str> {
        if groups.is_empty() {
            return Err("no scheduling groups configured");
        }
        if groups.len() > MAX_GROUPS {
            return Err("too many scheduling groups");
        }

        let mut table = [NO_GROUP; MAX_GROUPS];
        for (index, group_config) in groups.iter().enumerate() {
            if group_config.weight == 0 {
                return Err("scheduling group weight must be non-zero");
            }
            table[index] = Some(Group::new(group_config));
        }

        let mut contexts = [None; MAX_CONTEXTS];
        contexts[ContextId::IDLE.index()] = Some(Context::new(GroupId::INVALID));

        crate::kinfo!(
            "[sched] {} groups, min_timeout={} max_timeout={}",
            groups.len(),
            config.min_timeout,
            config.max_timeout
        );
        for (index, group_config) in groups.iter().enumerate() {
            crate::kdebug!(
                "[sched] group {} {}: weight={} warp={}",
                index,
                group_config.name,
                group_config.weight,
                group_config.warp
            );
        }

        Ok(Self {
            timer,
            groups: table,
            group_count: groups.len(),
            contexts,
            context_count: 1,
            current: ContextId::IDLE,
            min_vtime: 0,
            last_update: 0,
            yield_requested: false,
            need_resched: false,
            config,
            stats: SchedulerStats::new(),
        })
    }

    /// Create a schedulable context in `group`. Contexts live for the
    /// whole scheduling session; there is no removal.
    pub fn add_context(&mut self, group: GroupId) -> Result<ContextId, &'static str> {
        if !group.is_valid() || group.index() >= self.group_count {
            return Err("invalid group id");
        }
        if self.context_count >= MAX_CONTEXTS {
            return Err("context table full");
        }

        let id = ContextId::new(self.context_count);
        self.contexts[id.index()] = Some(Context::new(group));
        self.context_count += 1;

        crate::ktrace!("[add] ctx {} in group {}", id.index(), group.index());
        Ok(id)
    }

    /// Mark a context schedulable: it joins the back of its group's ready
    /// list. A group turning non-empty is re-seeded at the virtual-time
    /// floor minus its warp credit.
    pub fn ready(&mut self, id: ContextId) {
        let Some(snapshot) = self.snapshot(id) else {
            crate::kwarn!("[ready] unknown context {}", id.index());
            return;
        };
        if !snapshot.group.is_valid() {
            crate::kwarn!("[ready] the idle context cannot be made ready");
            return;
        }
        if snapshot.ready {
            crate::kwarn!("[ready] ctx {} is already ready", id.index());
            return;
        }

        let group_index = snapshot.group.index();
        let Some(group) = self.groups.get_mut(group_index).and_then(|slot| slot.as_mut()) else {
            crate::kwarn!("[ready] ctx {} has no group table entry", id.index());
            return;
        };

        if group.ready.is_empty() {
            group.seed(self.min_vtime);
            crate::ktrace!(
                "[ready] group {} re-seeded at vtime {}",
                group_index,
                group.vtime()
            );
        }

        if let Some(ctx) = self.contexts.get_mut(id.index()).and_then(|slot| slot.as_mut()) {
            ctx.ready = true;
        }
        group.ready.push_back(&mut self.contexts, id);
        group.refresh_min_vtime(&self.contexts);
        let group_vtime = group.vtime();

        if self.current.is_idle() {
            self.need_resched = true;
        } else if let Some(current_vtime) = self.group_vtime_of(self.current) {
            if group_vtime < current_vtime {
                self.need_resched = true;
            }
        }

        crate::ktrace!("[ready] ctx {} group {}", id.index(), group_index);
    }

    /// Take a context out of scheduling. If it is the current one it keeps
    /// running until the next `update()` picks a successor.
    pub fn unready(&mut self, id: ContextId) {
        let Some(snapshot) = self.snapshot(id) else {
            crate::kwarn!("[unready] unknown context {}", id.index());
            return;
        };
        if !snapshot.ready {
            crate::kwarn!("[unready] ctx {} is not ready", id.index());
            return;
        }

        if let Some(group) = self
            .groups
            .get_mut(snapshot.group.index())
            .and_then(|slot| slot.as_mut())
        {
            group.ready.remove(&mut self.contexts, id);
            group.refresh_min_vtime(&self.contexts);
        }
        if let Some(ctx) = self.contexts.get_mut(id.index()).and_then(|slot| slot.as_mut()) {
            ctx.ready = false;
        }

        if id == self.current {
            self.need_resched = true;
        }

        crate::ktrace!("[unready] ctx {}", id.index());
    }

    /// Give up the rest of the current slice: the next `update()` switches
    /// away even though the programmed deadline has not passed.
    pub fn yield_current(&mut self) {
        if self.current.is_idle() {
            crate::ktrace!("[yield] idle is current, nothing to yield");
            return;
        }
        self.yield_requested = true;
        self.need_resched = true;
        crate::ktrace!("[yield] ctx {}", self.current.index());
    }

    /// Advance the scheduling decision to the timer's current time.
    ///
    /// Must be called after every real-time change or readiness change.
    /// Consumes the elapsed time, possibly switches the current context,
    /// and reprograms the timer (deadline 0 while idle).
    pub fn update(&mut self) {
        let now = self.timer.time();
        let elapsed = now.saturating_sub(self.last_update);
        self.last_update = now;
        self.stats.updates = self.stats.updates.wrapping_add(1);

        let prev = self.current;
        self.attribute_elapsed(prev, elapsed);
        self.refresh_vtime_floor();

        // A context that consumed time (or yielded) goes to the back of
        // its rotation; zero-elapsed updates must stay stable.
        if elapsed > 0 || self.yield_requested {
            self.rotate_after_run(prev);
        }

        let (next, deadline) = match self.select_next() {
            Some((group_index, id, group_vtime)) => {
                let slice = self.slice_for(group_index, group_vtime);
                (id, now.saturating_add(slice))
            }
            None => (ContextId::IDLE, 0),
        };

        self.timer.set_timeout(deadline);

        if next != prev {
            self.note_switch(prev, next, now);
        }
        self.current = next;
        self.yield_requested = false;
        self.need_resched = false;

        crate::ktrace!(
            "[update] now={} current=ctx{} deadline={}",
            now,
            self.current.index(),
            deadline
        );
    }

    /// The presently selected context. The idle context before any
    /// `ready()` has been observed by an `update()`.
    pub fn current(&self) -> ContextId {
        self.current
    }

    /// Hint that an `update()` before the programmed deadline would change
    /// the decision. Cleared by `update()`.
    pub fn need_resched(&self) -> bool {
        self.need_resched
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn snapshot(&self, id: ContextId) -> Option<Context> {
        self.contexts.get(id.index()).and_then(|slot| slot.as_ref()).copied()
    }

    fn group_vtime_of(&self, id: ContextId) -> Option<VTicks> {
        let ctx = self.contexts.get(id.index()).and_then(|slot| slot.as_ref())?;
        if !ctx.group.is_valid() {
            return None;
        }
        self.groups
            .get(ctx.group.index())
            .and_then(|slot| slot.as_ref())
            .map(|group| group.vtime())
    }

    /// Charge the elapsed real time to whoever ran since the last update.
    fn attribute_elapsed(&mut self, prev: ContextId, elapsed: Ticks) {
        if elapsed == 0 {
            return;
        }
        let Some(ctx) = self.contexts.get_mut(prev.index()).and_then(|slot| slot.as_mut()) else {
            return;
        };
        ctx.execution_time = ctx.execution_time.saturating_add(elapsed);

        let group_id = ctx.group;
        if !group_id.is_valid() {
            self.stats.idle_ticks = self.stats.idle_ticks.saturating_add(elapsed);
            return;
        }
        let Some(group) = self.groups.get_mut(group_id.index()).and_then(|slot| slot.as_mut())
        else {
            return;
        };
        let delta = group.accrue(elapsed);
        ctx.vtime = ctx.vtime.saturating_add(delta);

        crate::ktrace!(
            "[update] ctx {} ran {} ticks, group {} vtime {}",
            prev.index(),
            elapsed,
            group_id.index(),
            group.vtime()
        );
    }

    /// Recompute the global floor and each contending group's member
    /// minimum. Groups without ready members do not participate.
    fn refresh_vtime_floor(&mut self) {
        let mut floor: Option<VTicks> = None;
        for group in self.groups.iter_mut().flatten() {
            if group.ready.is_empty() {
                continue;
            }
            group.refresh_min_vtime(&self.contexts);
            floor = Some(match floor {
                Some(floor) if floor <= group.vtime() => floor,
                _ => group.vtime(),
            });
        }
        if let Some(floor) = floor {
            self.min_vtime = floor;
        }
    }

    fn rotate_after_run(&mut self, prev: ContextId) {
        if prev.is_idle() {
            return;
        }
        let Some(snapshot) = self.snapshot(prev) else {
            return;
        };
        if !snapshot.ready {
            return;
        }
        if let Some(group) = self
            .groups
            .get_mut(snapshot.group.index())
            .and_then(|slot| slot.as_mut())
        {
            group.ready.rotate_to_back(&mut self.contexts, prev);
        }
    }

    /// Pick the group with the smallest vtime (declaration order breaks
    /// ties) and return its front context.
    fn select_next(&self) -> Option<(usize, ContextId, VTicks)> {
        let mut best: Option<(usize, VTicks)> = None;
        for (index, slot) in self.groups.iter().enumerate() {
            let Some(group) = slot.as_ref() else { continue };
            if group.ready.is_empty() {
                continue;
            }
            if overtakes(group.vtime(), best) {
                best = Some((index, group.vtime()));
            }
        }

        let (index, vtime) = best?;
        let front = self
            .groups
            .get(index)
            .and_then(|slot| slot.as_ref())
            .and_then(|group| group.ready.front());
        match front {
            Some(id) => Some((index, id, vtime)),
            None => {
                crate::kerror!("[update] group {} counts ready members but lists none", index);
                None
            }
        }
    }

    /// Slice for the chosen group: long enough to stay fair, short enough
    /// to hand off when another group comes due.
    ///
    /// A same-group peer is due immediately, so the gap collapses to zero
    /// and the slice is `min_timeout * weight`. Against other groups the
    /// gap is the smallest vtime distance. With no contention at all the
    /// slice relaxes to `max_timeout`.
    fn slice_for(&self, chosen: usize, chosen_vtime: VTicks) -> Ticks {
        let Some(group) = self.groups.get(chosen).and_then(|slot| slot.as_ref()) else {
            return self.config.max_timeout;
        };

        let gap = if group.ready.len() >= 2 {
            Some(0)
        } else {
            let mut nearest: Option<VTicks> = None;
            for (index, slot) in self.groups.iter().enumerate() {
                let Some(other) = slot.as_ref() else { continue };
                if index == chosen || other.ready.is_empty() {
                    continue;
                }
                let distance = other.vtime().saturating_sub(chosen_vtime);
                nearest = Some(match nearest {
                    Some(nearest) if nearest <= distance => nearest,
                    _ => distance,
                });
            }
            nearest
        };

        match gap {
            None => self.config.max_timeout,
            Some(gap) => {
                let gap = Ticks::try_from(gap).unwrap_or(0);
                gap.saturating_add(self.config.min_timeout)
                    .saturating_mul(group.weight())
                    .min(self.config.max_timeout)
            }
        }
    }

    fn note_switch(&mut self, prev: ContextId, next: ContextId, now: Ticks) {
        self.stats.context_switches = self.stats.context_switches.wrapping_add(1);

        let prev_still_ready = self
            .contexts
            .get(prev.index())
            .and_then(|slot| slot.as_ref())
            .map(|ctx| ctx.ready)
            .unwrap_or(false);
        if prev_still_ready {
            if self.yield_requested {
                self.stats.voluntary_switches = self.stats.voluntary_switches.wrapping_add(1);
            } else {
                self.stats.preemptions = self.stats.preemptions.wrapping_add(1);
            }
        }

        crate::kdebug!(
            "[update] switch ctx {} -> ctx {} at {}",
            prev.index(),
            next.index(),
            now
        );
    }
}

/// Strictly smaller vtime wins; an earlier-declared group keeps ties.
fn overtakes(vtime: VTicks, best: Option<(usize, VTicks)>) -> bool {
    match best {
        None => true,
        Some((_, best_vtime)) => vtime < best_vtime,
    }
}
