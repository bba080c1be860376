//! Scheduler type definitions
//!
//! This module contains the handle types, configuration and counters used
//! by the scheduler subsystem.

use crate::timer::Ticks;

/// Maximum number of scheduling groups.
pub const MAX_GROUPS: usize = 8;

/// Capacity of the context arena, idle slot included.
pub const MAX_CONTEXTS: usize = 64;

/// Default floor for a contended slice, in ticks.
pub const DEFAULT_MIN_TIMEOUT: Ticks = 500;

/// Default ceiling for any slice; also the slice granted to uncontended
/// work, in ticks.
pub const DEFAULT_MAX_TIMEOUT: Ticks = 100_000;

/// Virtual time. Signed: warp credit can seed a group below the global
/// minimum.
pub type VTicks = i64;

/// Relative CPU share of a group. Larger weight means more real time per
/// unit of virtual time.
pub type Weight = u64;

/// Stable handle into the scheduler's context arena. Slot 0 is the idle
/// context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextId(u16);

impl ContextId {
    pub const IDLE: ContextId = ContextId(0);

    pub(crate) const fn new(index: usize) -> Self {
        ContextId(index as u16)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_idle(self) -> bool {
        self.0 == 0
    }
}

/// Index of a scheduling group, in declaration order. Lower ids win
/// virtual-time ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupId(u8);

impl GroupId {
    /// Reserved id carried by the idle context, which belongs to no group.
    pub const INVALID: GroupId = GroupId(u8::MAX);

    /// Ids past the group arena collapse to [`GroupId::INVALID`] rather
    /// than wrapping onto a live slot.
    pub const fn new(index: usize) -> Self {
        if index >= MAX_GROUPS {
            return GroupId::INVALID;
        }
        GroupId(index as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_valid(self) -> bool {
        self.0 != u8::MAX
    }
}

/// Static description of one scheduling group.
#[derive(Clone, Copy, Debug)]
pub struct GroupConfig {
    /// Display name used in logs and state dumps.
    pub name: &'static str,
    /// Relative CPU share, must be non-zero.
    pub weight: Weight,
    /// Virtual-time credit granted when the group turns non-empty.
    /// Normally non-negative; larger values favor scheduling latency.
    pub warp: VTicks,
}

impl GroupConfig {
    pub const fn new(name: &'static str, weight: Weight, warp: VTicks) -> Self {
        Self { name, weight, warp }
    }
}

/// Timeout bounds applied to every computed slice.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    pub min_timeout: Ticks,
    pub max_timeout: Ticks,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_timeout: DEFAULT_MIN_TIMEOUT,
            max_timeout: DEFAULT_MAX_TIMEOUT,
        }
    }
}

/// Monotonic counters kept by the scheduler.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchedulerStats {
    /// Total `update()` calls.
    pub updates: u64,
    /// Times `update()` changed the current context.
    pub context_switches: u64,
    /// Switches away from a still-ready context after a yield request.
    pub voluntary_switches: u64,
    /// Switches away from a still-ready context without a yield request.
    pub preemptions: u64,
    /// Real time attributed to the idle context.
    pub idle_ticks: Ticks,
}

impl SchedulerStats {
    pub const fn new() -> Self {
        Self {
            updates: 0,
            context_switches: 0,
            voluntary_switches: 0,
            preemptions: 0,
            idle_ticks: 0,
        }
    }
}
