//! Device-wide constants.
//!
//! This module defines the fixed numbers of the MC146818 model. It includes:
//! 1. **Time base:** Nanosecond scaling and the 32.768 kHz divider chain frequency.
//! 2. **Update cycle:** The update-in-progress window and the divider restart delay.
//! 3. **Port layout:** Default ISA base port, IRQ line, and per-port offsets.

/// Nanoseconds in one second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Frequency of the divider chain input in the standard PC configuration (32.768 kHz).
pub const RTC_CLOCK_HZ: u64 = 32_768;

/// Length of the update-in-progress window that precedes each update cycle (244 us).
pub const UIP_WINDOW_NS: u64 = 244_000;

/// Delay between taking the divider chain out of reset and the first update (500 ms).
pub const DIVIDER_RESTART_DELAY_NS: u64 = 500_000_000;

/// Size of the CMOS register file in bytes.
pub const CMOS_SIZE: usize = 256;

/// First index of the extended (upper) CMOS bank.
pub const EXTENDED_BANK_BASE: u8 = 0x80;

/// Bit 7 of an index-port write masks NMIs on PC chipsets; it never selects a register.
pub const NMI_DISABLE_BIT: u8 = 0x80;

/// Standard ISA base port of the RTC.
pub const DEFAULT_IO_BASE: u16 = 0x70;

/// ISA IRQ line the RTC drives on PC platforms.
pub const DEFAULT_IRQ: u32 = 8;

/// Number of ports decoded by the device (index, data, extended index, extended data).
pub const RTC_PORT_COUNT: u16 = 4;

/// Port offset of the standard index register.
pub const PORT_INDEX: u16 = 0;

/// Port offset of the standard data register.
pub const PORT_DATA: u16 = 1;

/// Port offset of the extended-bank index register.
pub const PORT_EXT_INDEX: u16 = 2;

/// Port offset of the extended-bank data register.
pub const PORT_EXT_DATA: u16 = 3;
