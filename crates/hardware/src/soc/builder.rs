//! RTC construction and the shared device handle.
//!
//! This module attaches an RTC to an I/O bus. It performs:
//! 1. **Construction:** Builds a `CmosRtc` from a base year or a full `RtcConfig`.
//! 2. **Registration:** Places the device on the bus at its configured port range.
//! 3. **Sharing:** Returns an `RtcHandle`; the bus and the embedder hold clones, and every
//!    access to the device goes through the handle's lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::PrimitiveDateTime;

use crate::clock::{HostClock, SystemClock};
use crate::common::error::{ConfigError, SnapshotError};
use crate::config::RtcConfig;
use crate::soc::devices::CmosRtc;
use crate::soc::devices::cmos_rtc::snapshot::RtcSnapshot;
use crate::soc::interconnect::IoBus;
use crate::soc::irq::IrqSink;
use crate::soc::traits::Device;
use crate::stats::RtcStats;

/// Shared, serialized access to one RTC instance.
///
/// Cloning the handle shares the device. Lock poisoning is recovered, since the device state
/// is plain data that stays consistent between operations.
#[derive(Debug, Clone)]
pub struct RtcHandle {
    inner: Arc<Mutex<CmosRtc>>,
}

/// Creates an RTC on the host clocks with default configuration and `base_year`, and registers
/// it on `bus`.
///
/// # Examples
///
/// ```
/// use rtcsim_core::soc::builder::init;
/// use rtcsim_core::soc::interconnect::IoBus;
/// use rtcsim_core::soc::irq::LatchedIrq;
///
/// let mut bus = IoBus::new();
/// let rtc = init(&mut bus, 2000, Box::new(LatchedIrq::new()));
///
/// bus.write_u8(0x70, 0x0D);
/// assert_eq!(bus.read_u8(0x71), 0x80);
/// assert!(!rtc.irq_asserted());
/// ```
pub fn init(bus: &mut IoBus, base_year: i32, irq: Box<dyn IrqSink>) -> RtcHandle {
    let config = RtcConfig::with_base_year(base_year);
    let handle = RtcHandle::new(CmosRtc::new(config, Box::new(SystemClock::new()), irq));
    bus.add_device(Box::new(handle.clone()));
    handle
}

/// Validates `config`, creates an RTC on `clock`, and registers it on `bus`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if `config` fails validation; nothing is registered.
pub fn init_with_config(
    bus: &mut IoBus,
    config: RtcConfig,
    clock: Box<dyn HostClock>,
    irq: Box<dyn IrqSink>,
) -> Result<RtcHandle, ConfigError> {
    config.validate()?;
    let handle = RtcHandle::new(CmosRtc::new(config, clock, irq));
    bus.add_device(Box::new(handle.clone()));
    Ok(handle)
}

impl RtcHandle {
    /// Wraps a device that is not registered on any bus.
    pub fn new(rtc: CmosRtc) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rtc)),
        }
    }

    /// Locks the device for a compound operation.
    pub fn lock(&self) -> MutexGuard<'_, CmosRtc> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` at CMOS byte `addr` without going through the index port.
    ///
    /// This is NVRAM-style platform access: no register side effects, no re-latch of the
    /// clock, no timer changes. Use [`RtcHandle::write_register`] to act as the guest.
    pub fn set_cmos_byte(&self, addr: u8, value: u8) {
        self.lock().set_cmos_byte(addr, value);
    }

    /// Returns the stored CMOS byte `addr` without going through the index port.
    ///
    /// Reading register C this way leaves pending flags and the IRQ line untouched.
    pub fn get_cmos_byte(&self, addr: u8) -> u8 {
        self.lock().cmos_byte(addr)
    }

    /// Reads CMOS byte `addr` as the guest would see it (live UIP), without side effects.
    pub fn peek_cmos_byte(&self, addr: u8) -> u8 {
        self.lock().peek_register(addr)
    }

    /// Guest-equivalent register write: A/B take effect and time writes re-latch the clock.
    pub fn write_register(&self, addr: u8, value: u8) {
        self.lock().write_register(addr, value);
    }

    /// Guest-equivalent register read: reading register C acknowledges pending interrupts.
    pub fn read_register(&self, addr: u8) -> u8 {
        self.lock().read_register(addr)
    }

    /// Drops the periodic backlog and cancels any pending reinjection.
    pub fn reset_reinjection(&self) {
        self.lock().reset_reinjection();
    }

    /// Handles a jump of the host monotonic clock; `host_now` is the clock's new reading.
    pub fn notify_clock_reset(&self, host_now: u64) {
        self.lock().notify_clock_reset(host_now);
    }

    /// Handles the start of a host suspend.
    pub fn notify_suspend(&self) {
        self.lock().notify_suspend();
    }

    /// Handles the end of a host suspend.
    pub fn notify_resume(&self) {
        self.lock().notify_resume();
    }

    /// Cancels all timers.
    pub fn shutdown(&self) {
        self.lock().shutdown();
    }

    /// Captures the guest-visible state.
    pub fn snapshot(&self) -> RtcSnapshot {
        self.lock().snapshot()
    }

    /// Restores a captured state.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot's register image is malformed.
    pub fn restore(&self, snapshot: &RtcSnapshot) -> Result<(), SnapshotError> {
        self.lock().restore(snapshot)
    }

    /// Copy of the device counters.
    pub fn stats(&self) -> RtcStats {
        self.lock().stats().clone()
    }

    /// Current level of the IRQ line.
    pub fn irq_asserted(&self) -> bool {
        self.lock().irq_asserted()
    }

    /// Calendar time currently held by the clock.
    pub fn guest_time(&self) -> PrimitiveDateTime {
        self.lock().clock_time()
    }
}

impl Device for RtcHandle {
    fn name(&self) -> &'static str {
        self.lock().name()
    }

    fn port_range(&self) -> (u16, u16) {
        self.lock().port_range()
    }

    fn io_read(&mut self, offset: u16) -> u8 {
        self.lock().io_read(offset)
    }

    fn io_write(&mut self, offset: u16, val: u8) {
        self.lock().io_write(offset, val);
    }

    fn poll(&mut self, now_ns: u64) {
        self.lock().poll(now_ns);
    }

    fn next_deadline(&self) -> Option<u64> {
        self.lock().next_deadline()
    }

    fn get_irq_id(&self) -> Option<u32> {
        self.lock().get_irq_id()
    }
}
