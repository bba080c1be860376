//! Scheduler statistics and debugging functions
//!
//! Read-only introspection over groups, contexts and counters, plus the
//! state dump used when a scheduling invariant is violated. Tests observe
//! the scheduler through these accessors, the same contract production
//! diagnostics use.

use core::fmt;

use crate::timer::{Ticks, Timer};

use super::context::Context;
use super::core::Scheduler;
use super::group::Group;
use super::types::{ContextId, GroupId, SchedulerStats, VTicks};

impl<T: Timer> Scheduler<T> {
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        if !id.is_valid() {
            return None;
        }
        self.groups.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn context_count(&self) -> usize {
        self.context_count
    }

    /// The global virtual-time floor used to seed groups.
    pub fn min_vtime(&self) -> VTicks {
        self.min_vtime
    }

    /// Time of the last `update()`.
    pub fn last_update(&self) -> Ticks {
        self.last_update
    }

    pub fn for_each_group(&self, mut f: impl FnMut(GroupId, &Group)) {
        for (index, slot) in self.groups.iter().enumerate().take(self.group_count) {
            if let Some(group) = slot.as_ref() {
                f(GroupId::new(index), group);
            }
        }
    }

    /// Visit a group's ready contexts in rotation order, front first.
    pub fn for_each_ready(&self, id: GroupId, mut f: impl FnMut(ContextId)) {
        let Some(group) = self.group(id) else { return };
        group.ready.for_each(&self.contexts, |_, ctx_id| f(ctx_id));
    }

    /// Route the full state dump through the error log, one line at a
    /// time. Called when a decision contradicts an invariant; the dump is
    /// the diagnostic of record before the kernel halts.
    pub fn log_state(&self) {
        crate::kerror!(
            "[sched] state: now={} current=ctx{} min_vtime={} need_resched={}",
            self.last_update,
            self.current.index(),
            self.min_vtime,
            self.need_resched
        );
        for (index, slot) in self.groups.iter().enumerate().take(self.group_count) {
            let Some(group) = slot.as_ref() else { continue };
            crate::kerror!(
                "[sched] group {} {}: weight={} warp={} vtime={} carry={} min_vtime={} ready={}",
                index,
                group.name,
                group.weight,
                group.warp,
                group.vtime,
                group.carry,
                group.min_vtime,
                group.ready.len()
            );
            let mut position = 0;
            group.ready.for_each(&self.contexts, |_, id| {
                crate::kerror!("[sched]   queue[{}] = ctx {}", position, id.index());
                position += 1;
            });
        }
        for (index, slot) in self.contexts.iter().enumerate().take(self.context_count) {
            let Some(ctx) = slot.as_ref() else { continue };
            if ctx.group.is_valid() {
                crate::kerror!(
                    "[sched] ctx {}: group={} vtime={} exec_time={} ready={}",
                    index,
                    ctx.group.index(),
                    ctx.vtime,
                    ctx.execution_time,
                    ctx.ready
                );
            } else {
                crate::kerror!("[sched] ctx {}: idle exec_time={}", index, ctx.execution_time);
            }
        }
        crate::kerror!(
            "[sched] stats: updates={} switches={} voluntary={} preemptions={} idle_ticks={}",
            self.stats.updates,
            self.stats.context_switches,
            self.stats.voluntary_switches,
            self.stats.preemptions,
            self.stats.idle_ticks
        );
    }
}

impl<T: Timer> fmt::Display for Scheduler<T> {
    /// Multi-line state dump, mirroring `log_state`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "scheduler: now={} current=ctx{} min_vtime={} need_resched={}",
            self.last_update,
            self.current.index(),
            self.min_vtime,
            self.need_resched
        )?;

        for (index, slot) in self.groups.iter().enumerate().take(self.group_count) {
            let Some(group) = slot.as_ref() else { continue };
            write!(
                f,
                "group {} {}: weight={} warp={} vtime={} carry={} min_vtime={} queue=[",
                index,
                group.name,
                group.weight,
                group.warp,
                group.vtime,
                group.carry,
                group.min_vtime
            )?;
            let mut cursor = group.ready.front();
            let mut remaining = group.ready.len();
            let mut first = true;
            while remaining > 0 {
                let Some(id) = cursor else { break };
                let Some(ctx) = self.contexts.get(id.index()).and_then(|slot| slot.as_ref())
                else {
                    break;
                };
                if first {
                    write!(f, "{}", id.index())?;
                    first = false;
                } else {
                    write!(f, " {}", id.index())?;
                }
                cursor = ctx.next;
                remaining -= 1;
            }
            writeln!(f, "]")?;
        }

        for (index, slot) in self.contexts.iter().enumerate().take(self.context_count) {
            let Some(ctx) = slot.as_ref() else { continue };
            if ctx.group.is_valid() {
                writeln!(
                    f,
                    "ctx {}: group={} vtime={} exec_time={} ready={}",
                    index,
                    ctx.group.index(),
                    ctx.vtime,
                    ctx.execution_time,
                    ctx.ready
                )?;
            } else {
                writeln!(f, "ctx {}: idle exec_time={}", index, ctx.execution_time)?;
            }
        }

        write!(
            f,
            "stats: updates={} switches={} voluntary={} preemptions={} idle_ticks={}",
            self.stats.updates,
            self.stats.context_switches,
            self.stats.voluntary_switches,
            self.stats.preemptions,
            self.stats.idle_ticks
        )
    }
}
