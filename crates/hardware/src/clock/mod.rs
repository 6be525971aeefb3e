//! Host time sources and the guest time base.
//!
//! This module separates the two notions of time the device needs:
//! 1. **Host clocks:** A monotonic reading used for timer deadlines, plus the host wall
//!    clock used to seed guest time and to measure suspend gaps.
//! 2. **Time base:** The `(host reference, guest reference)` anchor from which the
//!    guest-visible time is derived, replacing the chip's own oscillator.

/// Host clock trait and implementations.
pub mod host;

/// Guest time base anchored to host monotonic time.
pub mod timebase;

pub use host::{HostClock, ManualClock, SystemClock};
pub use timebase::TimeBase;
