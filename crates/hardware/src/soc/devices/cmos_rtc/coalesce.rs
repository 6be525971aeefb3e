//! Interrupt coalescing and reinjection.
//!
//! A periodic tick that arrives while the previous one is still unacknowledged is not lost:
//! it is counted here and delivered later, one edge per acknowledgment, spaced by a
//! fraction of the period so a backlog drains faster than it accumulates.

use tracing::warn;

/// Largest divisor applied to the period when spacing reinjected ticks.
const MAX_REINJECT_SUBDIVISION: u32 = 8;

/// Delay between an acknowledgment and the next reinjected tick.
///
/// The period is split into `min(count, 7) + 1` parts, so deep backlogs drain up to eight
/// times faster than the nominal rate.
pub fn reinject_interval(period_ns: u64, count: u32) -> u64 {
    let parts = count.min(MAX_REINJECT_SUBDIVISION - 1) + 1;
    (period_ns / u64::from(parts)).max(1)
}

/// Bounded backlog of undelivered periodic ticks.
#[derive(Debug, Clone)]
pub struct Coalescer {
    count: u32,
    max: u32,
    dropped: u64,
    saturated: bool,
    reinject_at: Option<u64>,
}

impl Coalescer {
    /// Creates an empty backlog holding at most `max` ticks.
    pub const fn new(max: u32) -> Self {
        Self {
            count: 0,
            max,
            dropped: 0,
            saturated: false,
            reinject_at: None,
        }
    }

    /// Ticks waiting for reinjection.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Capacity of the backlog.
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Ticks dropped at the cap since creation.
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Adds `ticks` to the backlog; returns how many were dropped at the cap.
    pub fn absorb(&mut self, ticks: u64) -> u64 {
        let room = u64::from(self.max - self.count);
        let kept = ticks.min(room);
        let dropped = ticks - kept;
        self.count += kept as u32;
        debug_assert!(self.count <= self.max, "coalesced count above cap");
        if dropped > 0 {
            self.dropped += dropped;
            if !self.saturated {
                warn!(max = self.max, "periodic backlog full, dropping ticks");
            }
            self.saturated = true;
        }
        dropped
    }

    /// Takes one tick from the backlog; returns `false` if it was empty.
    pub fn take_one(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.saturated = false;
        true
    }

    /// Restores a backlog count, clamped to the cap.
    pub fn set_count(&mut self, count: u32) {
        self.count = count.min(self.max);
    }

    /// Empties the backlog and cancels any pending reinjection.
    pub fn reset(&mut self) {
        self.count = 0;
        self.saturated = false;
        self.reinject_at = None;
    }

    /// Schedules the next reinjection relative to `now_ns`.
    pub fn arm(&mut self, now_ns: u64, period_ns: u64) {
        self.reinject_at = Some(now_ns.saturating_add(reinject_interval(period_ns, self.count)));
    }

    /// Pending reinjection deadline.
    pub const fn next_deadline(&self) -> Option<u64> {
        self.reinject_at
    }

    /// Consumes the reinjection deadline if it is due at `now_ns`.
    pub fn expire(&mut self, now_ns: u64) -> bool {
        match self.reinject_at {
            Some(at) if at <= now_ns => {
                self.reinject_at = None;
                true
            }
            _ => false,
        }
    }
}
