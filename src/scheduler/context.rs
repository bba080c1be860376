//! Schedulable context records.
//!
//! A context is one slot in the scheduler-owned arena: its group tag, the
//! accounting clocks, and the links tying it into its group's ready list.
//! Links are arena indices, so records stay plain data and the arena can
//! live in a fixed array.

use crate::timer::Ticks;

use super::types::{ContextId, GroupId, VTicks};

#[derive(Clone, Copy, Debug)]
pub struct Context {
    /// Owning group, fixed at creation. `GroupId::INVALID` only for idle.
    pub(crate) group: GroupId,
    /// Virtual time consumed while dispatched. Never decreases.
    pub(crate) vtime: VTicks,
    /// Real time spent dispatched. Never decreases.
    pub(crate) execution_time: Ticks,
    /// Whether the context sits in its group's ready list.
    pub(crate) ready: bool,
    pub(crate) next: Option<ContextId>,
    pub(crate) prev: Option<ContextId>,
}

impl Context {
    pub(crate) const fn new(group: GroupId) -> Self {
        Self {
            group,
            vtime: 0,
            execution_time: 0,
            ready: false,
            next: None,
            prev: None,
        }
    }

    pub const fn group(&self) -> GroupId {
        self.group
    }

    pub const fn vtime(&self) -> VTicks {
        self.vtime
    }

    pub const fn execution_time(&self) -> Ticks {
        self.execution_time
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }
}
