//! Guest time base.
//!
//! Guest time is never counted; it is derived. A `TimeBase` pins one guest instant to one
//! host monotonic instant, and the guest time at any later host instant is that guest
//! instant plus the host time elapsed since. Guest writes to the clock, suspend, and host
//! clock resets all become re-anchoring operations on this pair.

use crate::common::constants::NANOS_PER_SEC;

/// Anchor pair mapping host monotonic time to guest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    /// Host monotonic instant of the anchor, in nanoseconds.
    host_ref_ns: u64,
    /// Guest time at the anchor, in nanoseconds since the Unix epoch.
    guest_ref_ns: i128,
}

impl TimeBase {
    /// Creates a time base where `guest_ns` corresponds to host instant `host_ns`.
    pub const fn new(host_ns: u64, guest_ns: i128) -> Self {
        Self {
            host_ref_ns: host_ns,
            guest_ref_ns: guest_ns,
        }
    }

    /// Host reference instant.
    pub const fn host_ref_ns(&self) -> u64 {
        self.host_ref_ns
    }

    /// Guest time at the host reference instant.
    pub const fn guest_ref_ns(&self) -> i128 {
        self.guest_ref_ns
    }

    /// Guest time (ns since the Unix epoch) at host instant `host_ns`.
    pub const fn guest_ns(&self, host_ns: u64) -> i128 {
        self.guest_ref_ns + (host_ns as i128 - self.host_ref_ns as i128)
    }

    /// Whole guest seconds (Unix time, floored) at host instant `host_ns`.
    pub const fn guest_secs(&self, host_ns: u64) -> i64 {
        self.guest_ns(host_ns).div_euclid(NANOS_PER_SEC as i128) as i64
    }

    /// Host instant at which guest time reaches `guest_ns`; zero if that lies before the
    /// host clock origin.
    pub fn host_ns_for(&self, guest_ns: i128) -> u64 {
        let host = self.host_ref_ns as i128 + (guest_ns - self.guest_ref_ns);
        host.clamp(0, u64::MAX as i128) as u64
    }

    /// Host instant at which guest time reaches the start of Unix second `secs`.
    pub fn host_ns_for_secs(&self, secs: i64) -> u64 {
        self.host_ns_for(secs as i128 * NANOS_PER_SEC as i128)
    }

    /// Re-anchors so that guest time `guest_ns` corresponds to host instant `host_ns`.
    pub fn anchor(&mut self, host_ns: u64, guest_ns: i128) {
        self.host_ref_ns = host_ns;
        self.guest_ref_ns = guest_ns;
    }

    /// Moves guest time by `delta_ns` at every host instant.
    pub fn shift(&mut self, delta_ns: i128) {
        self.guest_ref_ns += delta_ns;
    }
}
