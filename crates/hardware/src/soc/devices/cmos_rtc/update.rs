//! Update cycle controller.
//!
//! This module owns the guest clock. It provides:
//! 1. **Time base:** Guest time is derived from host monotonic time through a [`TimeBase`].
//! 2. **Clock:** The whole second currently shown in the time registers.
//! 3. **Scheduling:** One update deadline per guest second while the clock runs.
//! 4. **Lost ticks:** When an update runs late by more than a second, the configured
//!    [`LostTickPolicy`] decides whether the missed seconds are discarded or replayed.

use tracing::{debug, trace};

use crate::clock::TimeBase;
use crate::common::constants::{DIVIDER_RESTART_DELAY_NS, NANOS_PER_SEC};
use crate::config::{LostTickPolicy, RtcConfig};

/// Outcome of servicing one update deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStep {
    /// Whether the clock advanced and flags/alarm must be evaluated.
    pub evaluate: bool,
    /// Seconds skipped without evaluation.
    pub discarded: u64,
    /// Whether this evaluation replayed a second behind the time base.
    pub slewed: bool,
}

/// Guest clock and update-cycle scheduler.
#[derive(Debug, Clone)]
pub struct UpdateController {
    base: TimeBase,
    clock_secs: i64,
    running: bool,
    next_deadline: Option<u64>,
    last_seen_ns: i128,
    policy: LostTickPolicy,
    slew_step_ns: u64,
    max_backlog_secs: u64,
}

impl UpdateController {
    /// Creates a stopped controller showing guest time `guest_ns` at host instant `now_ns`.
    pub fn new(config: &RtcConfig, now_ns: u64, guest_ns: i128) -> Self {
        Self {
            base: TimeBase::new(now_ns, guest_ns),
            clock_secs: guest_ns.div_euclid(NANOS_PER_SEC as i128) as i64,
            running: false,
            next_deadline: None,
            last_seen_ns: guest_ns,
            policy: config.lost_tick_policy,
            slew_step_ns: NANOS_PER_SEC / u64::from(config.slew_catchup_factor.max(1)),
            max_backlog_secs: config.max_slew_backlog_secs,
        }
    }

    /// Whole guest second shown in the time registers.
    pub const fn clock_secs(&self) -> i64 {
        self.clock_secs
    }

    /// Returns whether update cycles are scheduled.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Next update deadline, if running.
    pub const fn next_deadline(&self) -> Option<u64> {
        self.next_deadline
    }

    /// Guest time at `now_ns`: the time base while running, the frozen clock otherwise.
    pub fn guest_ns(&self, now_ns: u64) -> i128 {
        if self.running {
            self.base.guest_ns(now_ns)
        } else {
            self.clock_secs as i128 * NANOS_PER_SEC as i128
        }
    }

    /// Records the guest time seen at `now_ns`; the floor for later clock resets.
    pub fn observe(&mut self, now_ns: u64) {
        self.last_seen_ns = self.last_seen_ns.max(self.guest_ns(now_ns));
    }

    fn schedule_next(&mut self) {
        self.next_deadline = Some(self.base.host_ns_for_secs(self.clock_secs + 1));
    }

    /// Sets the clock to `secs`, starting the second at `now_ns`.
    pub fn latch(&mut self, now_ns: u64, secs: i64) {
        trace!(secs, "clock latched");
        self.clock_secs = secs;
        self.base.anchor(now_ns, secs as i128 * NANOS_PER_SEC as i128);
        self.last_seen_ns = self.base.guest_ns(now_ns);
        if self.running {
            self.schedule_next();
        }
    }

    /// Starts update cycles with the current second already under way.
    pub fn start(&mut self) {
        self.running = true;
        self.schedule_next();
    }

    /// Restarts the clock after the divider chain leaves reset; first update 500 ms later.
    pub fn start_after_divider_reset(&mut self, now_ns: u64) {
        let guest = self.clock_secs as i128 * NANOS_PER_SEC as i128
            + (NANOS_PER_SEC - DIVIDER_RESTART_DELAY_NS) as i128;
        self.base.anchor(now_ns, guest);
        debug!(secs = self.clock_secs, "divider released");
        self.start();
    }

    /// Stops update cycles; the clock keeps its current second.
    pub fn halt(&mut self) {
        self.running = false;
        self.next_deadline = None;
    }

    /// Services the update deadline at `now_ns`, if due.
    pub fn on_deadline(&mut self, now_ns: u64) -> UpdateStep {
        match self.next_deadline {
            Some(at) if at <= now_ns && self.running => {}
            _ => return UpdateStep::default(),
        }

        let reference = self.base.guest_secs(now_ns);
        let behind = reference - self.clock_secs;
        if behind <= 0 {
            // Clock already level with the time base (host clock reset).
            self.schedule_next();
            return UpdateStep::default();
        }
        if behind == 1 {
            self.clock_secs += 1;
            self.schedule_next();
            return UpdateStep {
                evaluate: true,
                ..UpdateStep::default()
            };
        }

        let backlog = (behind - 1) as u64;
        match self.policy {
            LostTickPolicy::Discard => {
                debug!(backlog, "update cycle late, discarding missed seconds");
                self.clock_secs = reference;
                self.schedule_next();
                UpdateStep {
                    evaluate: true,
                    discarded: backlog,
                    slewed: false,
                }
            }
            LostTickPolicy::Slew => {
                let discarded = backlog.saturating_sub(self.max_backlog_secs);
                if discarded > 0 {
                    debug!(discarded, "slew backlog over limit");
                }
                self.clock_secs += discarded as i64 + 1;
                if self.clock_secs < reference {
                    self.next_deadline = Some(now_ns.saturating_add(self.slew_step_ns));
                } else {
                    self.schedule_next();
                }
                UpdateStep {
                    evaluate: true,
                    discarded,
                    slewed: true,
                }
            }
        }
    }

    /// Re-anchors after the host monotonic clock jumped to `now_ns`.
    ///
    /// Guest time resumes from the latest value already observed, so it never moves backwards.
    pub fn clock_reset(&mut self, now_ns: u64) {
        let floor = self
            .last_seen_ns
            .max(self.clock_secs as i128 * NANOS_PER_SEC as i128);
        self.base.anchor(now_ns, floor);
        if self.running {
            self.schedule_next();
        }
    }

    /// Moves guest time by `delta_ns` and shows the resulting second without replaying the gap.
    pub fn shift(&mut self, now_ns: u64, delta_ns: i128) {
        self.base.shift(delta_ns);
        self.rebase(now_ns);
    }

    /// Pins guest time `guest_ns` to host instant `now_ns` without replaying any gap.
    pub fn reanchor(&mut self, now_ns: u64, guest_ns: i128) {
        self.base.anchor(now_ns, guest_ns);
        self.rebase(now_ns);
    }

    fn rebase(&mut self, now_ns: u64) {
        self.clock_secs = self.base.guest_secs(now_ns);
        self.last_seen_ns = self.base.guest_ns(now_ns);
        if self.running {
            self.schedule_next();
        }
    }
}
