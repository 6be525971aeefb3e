//! Host clock sources.
//!
//! `SystemClock` reads the real host clocks. `ManualClock` is a shared, hand-driven clock
//! for deterministic simulation and tests: clones observe the same time, so a driver can
//! keep one copy while the device owns another.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::common::constants::NANOS_PER_SEC;

/// Source of host time for one device.
pub trait HostClock: Send + fmt::Debug {
    /// Monotonic host time in nanoseconds since an arbitrary origin.
    ///
    /// All timer deadlines are expressed on this scale.
    fn monotonic_ns(&self) -> u64;

    /// Host wall-clock time in nanoseconds since the Unix epoch (UTC).
    fn wall_ns(&self) -> i128;
}

/// Host clock backed by `Instant` and `SystemTime`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose monotonic origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn monotonic_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn wall_ns(&self) -> i128 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_nanos() as i128,
            Err(before) => -(before.duration().as_nanos() as i128),
        }
    }
}

#[derive(Debug)]
struct ManualClockState {
    monotonic_ns: AtomicU64,
    wall_ns: AtomicI64,
}

/// Hand-driven host clock; all clones share one time.
#[derive(Clone)]
pub struct ManualClock {
    state: Arc<ManualClockState>,
}

impl ManualClock {
    /// Creates a clock at monotonic zero whose wall clock reads `unix_secs`.
    pub fn from_unix_secs(unix_secs: i64) -> Self {
        Self {
            state: Arc::new(ManualClockState {
                monotonic_ns: AtomicU64::new(0),
                wall_ns: AtomicI64::new(unix_secs.saturating_mul(NANOS_PER_SEC as i64)),
            }),
        }
    }

    /// Advances both the monotonic and wall clocks.
    pub fn advance(&self, by: Duration) {
        let ns = by.as_nanos() as u64;
        let _ = self.state.monotonic_ns.fetch_add(ns, Ordering::SeqCst);
        let _ = self.state.wall_ns.fetch_add(ns as i64, Ordering::SeqCst);
    }

    /// Moves the monotonic clock to `ns`, dragging the wall clock by the same delta.
    ///
    /// Moving backwards models a host clock reset.
    pub fn set_monotonic_ns(&self, ns: u64) {
        let prev = self.state.monotonic_ns.swap(ns, Ordering::SeqCst);
        let delta = ns as i64 - prev as i64;
        let _ = self.state.wall_ns.fetch_add(delta, Ordering::SeqCst);
    }

    /// Advances the wall clock only, as a host suspend does to `CLOCK_MONOTONIC`.
    pub fn suspend_for(&self, gap: Duration) {
        let _ = self
            .state
            .wall_ns
            .fetch_add(gap.as_nanos() as i64, Ordering::SeqCst);
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("monotonic_ns", &self.monotonic_ns())
            .field("wall_ns", &self.wall_ns())
            .finish()
    }
}

impl HostClock for ManualClock {
    fn monotonic_ns(&self) -> u64 {
        self.state.monotonic_ns.load(Ordering::SeqCst)
    }

    fn wall_ns(&self) -> i128 {
        self.state.wall_ns.load(Ordering::SeqCst) as i128
    }
}
