//! Time source seam.
//!
//! The scheduler never owns a hardware timer. It reads the current
//! absolute time from this trait and writes back the absolute deadline at
//! which it wants to be re-invoked. The embedding kernel maps the trait
//! onto its tick source; tests drive it by hand.

/// Absolute real time, in timer ticks.
pub type Ticks = u64;

pub trait Timer {
    /// Current absolute time.
    fn time(&self) -> Ticks;

    /// Program the next scheduling deadline. A deadline of 0 means no
    /// deadline is armed (nothing to preempt).
    fn set_timeout(&mut self, deadline: Ticks);
}
