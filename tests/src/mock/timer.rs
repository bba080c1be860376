//! Manually driven timer device.

use crate::timer::{Ticks, Timer};

/// Timer double with a hand-cranked clock.
///
/// Tests advance the clock with [`MockTimer::advance_to`] before calling
/// into the scheduler, then read the deadline the scheduler programmed via
/// [`MockTimer::armed_deadline`]. Time never moves on its own.
#[derive(Debug, Default)]
pub struct MockTimer {
    now: Ticks,
    armed: Ticks,
}

impl MockTimer {
    pub fn new() -> Self {
        Self { now: 0, armed: 0 }
    }

    /// Move the clock forward to `now`. Panics if the clock would go
    /// backwards, since the scheduler is entitled to a monotonic time
    /// source.
    pub fn advance_to(&mut self, now: Ticks) {
        assert!(
            now >= self.now,
            "mock clock moved backwards: {} -> {}",
            self.now,
            now
        );
        self.now = now;
    }

    /// The absolute deadline most recently programmed, 0 when disarmed.
    pub fn armed_deadline(&self) -> Ticks {
        self.armed
    }
}

impl Timer for MockTimer {
    fn time(&self) -> Ticks {
        self.now
    }

    fn set_timeout(&mut self, deadline: Ticks) {
        self.armed = deadline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero_and_disarmed() {
        let timer = MockTimer::new();
        assert_eq!(timer.time(), 0);
        assert_eq!(timer.armed_deadline(), 0);
    }

    #[test]
    fn advance_and_arm() {
        let mut timer = MockTimer::new();
        timer.advance_to(250);
        timer.set_timeout(750);
        assert_eq!(timer.time(), 250);
        assert_eq!(timer.armed_deadline(), 750);
    }

    #[test]
    #[should_panic(expected = "mock clock moved backwards")]
    fn backwards_clock_panics() {
        let mut timer = MockTimer::new();
        timer.advance_to(100);
        timer.advance_to(99);
    }
}
