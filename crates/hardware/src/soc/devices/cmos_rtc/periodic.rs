//! Periodic interrupt scheduler.
//!
//! Deadlines are derived from the arming instant and an integer count of elapsed periods, so
//! rounding never accumulates: the `k`th deadline is `origin + ceil(k * ticks * 1e9 / 32768)`.

use crate::common::constants::{NANOS_PER_SEC, RTC_CLOCK_HZ};

/// Converts a 32.768 kHz tick count to nanoseconds, rounding up.
pub const fn ticks_to_ns(ticks: u128) -> u64 {
    let hz = RTC_CLOCK_HZ as u128;
    ((ticks * NANOS_PER_SEC as u128).div_ceil(hz)) as u64
}

/// Periodic timer state.
#[derive(Debug, Clone, Default)]
pub struct PeriodicTimer {
    period_ticks: u32,
    origin_ns: u64,
    /// Period index of `next_deadline`.
    index: u64,
    next_deadline: Option<u64>,
}

impl PeriodicTimer {
    /// Creates a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer with its first deadline one period after `now_ns`.
    pub fn arm(&mut self, now_ns: u64, period_ticks: u32) {
        debug_assert!(period_ticks != 0, "periodic timer armed with zero period");
        self.period_ticks = period_ticks;
        self.origin_ns = now_ns;
        self.index = 1;
        self.next_deadline = Some(self.deadline(1));
    }

    /// Cancels the timer.
    pub fn disarm(&mut self) {
        self.period_ticks = 0;
        self.next_deadline = None;
    }

    /// Returns whether a deadline is pending.
    pub const fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// Period in ticks (0 when disarmed).
    pub const fn period_ticks(&self) -> u32 {
        self.period_ticks
    }

    /// Period length in nanoseconds, rounded up (0 when disarmed).
    pub const fn period_ns(&self) -> u64 {
        ticks_to_ns(self.period_ticks as u128)
    }

    /// Next deadline, if armed.
    pub const fn next_deadline(&self) -> Option<u64> {
        self.next_deadline
    }

    fn deadline(&self, index: u64) -> u64 {
        let offset = ticks_to_ns(u128::from(index) * u128::from(self.period_ticks));
        self.origin_ns.saturating_add(offset)
    }

    /// Consumes every deadline at or before `now_ns`.
    ///
    /// Returns the number of periods that elapsed (0 if none were due) and advances the
    /// deadline to the first period boundary after `now_ns`.
    pub fn expire(&mut self, now_ns: u64) -> u64 {
        let Some(deadline) = self.next_deadline else {
            return 0;
        };
        if now_ns < deadline {
            return 0;
        }
        let elapsed = u128::from(now_ns - self.origin_ns);
        let span = u128::from(self.period_ticks) * NANOS_PER_SEC as u128;
        // Largest k with ceil(k * span / hz) <= elapsed.
        let mut reached = (elapsed * RTC_CLOCK_HZ as u128 / span) as u64;
        while self.deadline(reached + 1) <= now_ns {
            reached += 1;
        }
        while reached > 0 && self.deadline(reached) > now_ns {
            reached -= 1;
        }
        let fired = (reached + 1).saturating_sub(self.index);
        self.index = reached + 1;
        self.next_deadline = Some(self.deadline(self.index));
        fired
    }
}
