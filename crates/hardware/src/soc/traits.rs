//! Device trait for port-mapped I/O.
//!
//! This module defines the `Device` trait implemented by all bus-attached components. It provides:
//! 1. **Identification:** `name` and `port_range` for bus routing.
//! 2. **Access:** Byte read/write at device-relative port offsets.
//! 3. **Timers:** `next_deadline` and `poll` so an external event loop can drive device timers.
//! 4. **Interrupts:** Optional IRQ line number reporting.
//!
//! All implementors must be `Send` so a bus can be moved to the thread running the event loop.

/// Trait for port-mapped I/O devices attached to an [`IoBus`](crate::soc::interconnect::IoBus).
///
/// Devices provide a name, a port range, and byte read/write methods. Devices with timers
/// report their earliest deadline and are polled by the event loop once it has passed.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"CMOS-RTC"`).
    fn name(&self) -> &'static str;

    /// Returns `(base_port, port_count)` decoded by this device.
    fn port_range(&self) -> (u16, u16);

    /// Reads one byte at the given device-relative port offset.
    fn io_read(&mut self, offset: u16) -> u8;

    /// Writes one byte at the given device-relative port offset.
    fn io_write(&mut self, offset: u16, val: u8);

    /// Services every timer whose deadline is at or before `now_ns` (host monotonic ns).
    fn poll(&mut self, _now_ns: u64) {}

    /// Returns the earliest pending timer deadline in host monotonic ns, if any.
    fn next_deadline(&self) -> Option<u64> {
        None
    }

    /// Returns the IRQ line this device drives, if it can raise interrupts.
    fn get_irq_id(&self) -> Option<u32> {
        None
    }
}
