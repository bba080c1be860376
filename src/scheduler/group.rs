//! Weighted scheduling groups and their ready lists.
//!
//! A group owns the ordered list of its ready contexts. Order is rotation
//! order, not priority order: the front runs next, and a context that ran
//! moves to the back. The list is doubly linked through the context arena
//! by index, which keeps push, remove and rotate O(1) without pointers.

use crate::timer::Ticks;

use super::context::Context;
use super::types::{ContextId, GroupConfig, VTicks, Weight};

/// Intrusive-by-index list of ready contexts. The links live in the
/// `Context` records; this header only tracks the ends and the length.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReadyList {
    head: Option<ContextId>,
    tail: Option<ContextId>,
    len: usize,
}

impl ReadyList {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) const fn front(&self) -> Option<ContextId> {
        self.head
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a context. The caller guarantees it is not already linked.
    pub(crate) fn push_back(&mut self, contexts: &mut [Option<Context>], id: ContextId) {
        let old_tail = self.tail;

        let Some(ctx) = contexts.get_mut(id.index()).and_then(|slot| slot.as_mut()) else {
            return;
        };
        ctx.prev = old_tail;
        ctx.next = None;

        match old_tail {
            Some(tail_id) => {
                if let Some(tail) = contexts.get_mut(tail_id.index()).and_then(|slot| slot.as_mut())
                {
                    tail.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }

        self.tail = Some(id);
        self.len += 1;
    }

    /// Unlink a context. The caller guarantees it is linked here.
    pub(crate) fn remove(&mut self, contexts: &mut [Option<Context>], id: ContextId) {
        let (prev, next) = match contexts.get(id.index()).and_then(|slot| slot.as_ref()) {
            Some(ctx) => (ctx.prev, ctx.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(p) = contexts.get_mut(prev_id.index()).and_then(|slot| slot.as_mut()) {
                    p.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(n) = contexts.get_mut(next_id.index()).and_then(|slot| slot.as_mut()) {
                    n.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(ctx) = contexts.get_mut(id.index()).and_then(|slot| slot.as_mut()) {
            ctx.prev = None;
            ctx.next = None;
        }

        self.len = self.len.saturating_sub(1);
    }

    /// Move a linked context to the back, advancing the rotation.
    pub(crate) fn rotate_to_back(&mut self, contexts: &mut [Option<Context>], id: ContextId) {
        if self.len < 2 || self.tail == Some(id) {
            return;
        }
        self.remove(contexts, id);
        self.push_back(contexts, id);
    }

    /// Visit the list front to back. Bounded by the recorded length so a
    /// corrupt link cannot loop forever.
    pub(crate) fn for_each(&self, contexts: &[Option<Context>], mut f: impl FnMut(&Context, ContextId)) {
        let mut cursor = self.head;
        let mut remaining = self.len;
        while remaining > 0 {
            let Some(id) = cursor else { break };
            let Some(ctx) = contexts.get(id.index()).and_then(|slot| slot.as_ref()) else {
                break;
            };
            f(ctx, id);
            cursor = ctx.next;
            remaining -= 1;
        }
    }
}

/// One weighted bucket of ready contexts.
pub struct Group {
    pub(crate) name: &'static str,
    pub(crate) weight: Weight,
    pub(crate) warp: VTicks,
    /// Aggregate virtual time, advanced by `elapsed / weight` while a
    /// member runs. Re-seeded only on the empty-to-non-empty transition.
    pub(crate) vtime: VTicks,
    /// Remainder of the weight division, so accrual is exact over time.
    pub(crate) carry: Ticks,
    /// Smallest `vtime` among the ready members.
    pub(crate) min_vtime: VTicks,
    pub(crate) ready: ReadyList,
}

impl Group {
    pub(crate) fn new(config: &GroupConfig) -> Self {
        Self {
            name: config.name,
            weight: config.weight,
            warp: config.warp,
            vtime: 0,
            carry: 0,
            min_vtime: 0,
            ready: ReadyList::new(),
        }
    }

    /// Re-seed virtual time when the group turns non-empty: start at the
    /// global floor minus the warp credit, with a fresh division carry.
    pub(crate) fn seed(&mut self, floor: VTicks) {
        self.vtime = floor.saturating_sub(self.warp);
        self.carry = 0;
    }

    /// Attribute elapsed real time, returning the virtual-time delta.
    pub(crate) fn accrue(&mut self, elapsed: Ticks) -> VTicks {
        let total = elapsed.saturating_add(self.carry);
        self.carry = total % self.weight;
        let delta = VTicks::try_from(total / self.weight).unwrap_or(VTicks::MAX);
        self.vtime = self.vtime.saturating_add(delta);
        delta
    }

    /// Recompute `min_vtime` from the ready members. Keeps the last value
    /// while the group is empty.
    pub(crate) fn refresh_min_vtime(&mut self, contexts: &[Option<Context>]) {
        let mut min: Option<VTicks> = None;
        self.ready.for_each(contexts, |ctx, _| {
            min = Some(match min {
                Some(current) if current <= ctx.vtime => current,
                _ => ctx.vtime,
            });
        });
        if let Some(min) = min {
            self.min_vtime = min;
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub const fn weight(&self) -> Weight {
        self.weight
    }

    pub const fn warp(&self) -> VTicks {
        self.warp
    }

    pub const fn vtime(&self) -> VTicks {
        self.vtime
    }

    pub const fn min_vtime(&self) -> VTicks {
        self.min_vtime
    }

    pub const fn ready_count(&self) -> usize {
        self.ready.len()
    }
}
