//! MC146818 CMOS real-time clock device model.
//!
//! This crate implements the PC RTC/CMOS chip for virtual machines with the following:
//! 1. **Device:** Register file, BCD/binary time codec, periodic/update/alarm interrupts.
//! 2. **Timing:** Host clock abstraction and a guest time base immune to host stalls,
//!    suspends, and clock resets, with coalescing and reinjection of missed ticks.
//! 3. **Platform:** Port I/O bus, IRQ line, and a shared handle for attaching the device.
//! 4. **Simulation:** Configuration, statistics, and a deterministic event loop.

/// Host clocks and the guest time base.
pub mod clock;
/// Common constants and error types.
pub mod common;
/// Device configuration (defaults, policies, JSON loading).
pub mod config;
/// Deterministic event loop driving a device.
pub mod sim;
/// Platform glue (bus, IRQ line, builder) and the device itself.
pub mod soc;
/// Device statistics collection and reporting.
pub mod stats;

/// Device configuration; use `RtcConfig::default()` or load from JSON.
pub use crate::config::RtcConfig;
/// Shared device handle returned by [`soc::init`].
pub use crate::soc::RtcHandle;
/// The RTC device.
pub use crate::soc::devices::CmosRtc;
