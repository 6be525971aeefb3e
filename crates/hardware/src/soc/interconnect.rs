//! Port I/O interconnect.
//!
//! This module implements the bus that routes I/O port accesses to devices. It provides:
//! 1. **Device registration:** Devices are added by port range and kept sorted for lookup.
//! 2. **Access routing:** Byte read/write by port with a last-device hint.
//! 3. **Timer fan-out:** The earliest deadline across devices, and polling of all devices.
//!
//! Reads from ports no device claims float high (`0xFF`), as on an ISA bus.

use tracing::trace;

use super::traits::Device;

/// Value read from an unclaimed port.
const OPEN_BUS: u8 = 0xFF;

/// I/O bus connecting the event loop and guest accesses to devices.
#[derive(Default)]
pub struct IoBus {
    /// Registered devices, sorted by base port.
    devices: Vec<Box<dyn Device>>,
    last_device_idx: usize,
}

impl IoBus {
    /// Creates an empty bus; add devices with `add_device`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device on the bus; devices are sorted by base port for lookup.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device to add.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        trace!(name = dev.name(), ports = ?dev.port_range(), "device registered");
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.port_range().0);
        self.last_device_idx = 0;
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns whether some device decodes `port`.
    pub fn is_claimed(&self, port: u16) -> bool {
        self.devices.iter().any(|d| Self::decodes(d.as_ref(), port))
    }

    fn decodes(dev: &dyn Device, port: u16) -> bool {
        let (start, count) = dev.port_range();
        port >= start && u32::from(port) < u32::from(start) + u32::from(count)
    }

    fn find_device(&mut self, port: u16) -> Option<(&mut Box<dyn Device>, u16)> {
        if self.last_device_idx < self.devices.len()
            && Self::decodes(self.devices[self.last_device_idx].as_ref(), port)
        {
            let start = self.devices[self.last_device_idx].port_range().0;
            return Some((&mut self.devices[self.last_device_idx], port - start));
        }

        for (i, dev) in self.devices.iter_mut().enumerate() {
            if Self::decodes(dev.as_ref(), port) {
                self.last_device_idx = i;
                let start = dev.port_range().0;
                return Some((dev, port - start));
            }
        }
        None
    }

    /// Reads one byte from `port`; returns `0xFF` if no device claims it.
    pub fn read_u8(&mut self, port: u16) -> u8 {
        self.find_device(port)
            .map_or(OPEN_BUS, |(dev, offset)| dev.io_read(offset))
    }

    /// Writes one byte to `port`; no-op if no device claims it.
    pub fn write_u8(&mut self, port: u16, val: u8) {
        if let Some((dev, offset)) = self.find_device(port) {
            dev.io_write(offset, val);
        }
    }

    /// Polls every device at host instant `now_ns`.
    pub fn poll(&mut self, now_ns: u64) {
        for dev in &mut self.devices {
            dev.poll(now_ns);
        }
    }

    /// Returns the earliest deadline of any device.
    pub fn next_deadline(&self) -> Option<u64> {
        self.devices.iter().filter_map(|d| d.next_deadline()).min()
    }

    /// Returns the IRQ lines of all devices that report one.
    pub fn irq_lines(&self) -> Vec<(&'static str, u32)> {
        self.devices
            .iter()
            .filter_map(|d| d.get_irq_id().map(|irq| (d.name(), irq)))
            .collect()
    }
}

impl std::fmt::Debug for IoBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoBus")
            .field(
                "devices",
                &self.devices.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
