//! Register map of the MC146818.
//!
//! Indices 0x00-0x0D are the clock and control registers; the remainder of the 256-byte
//! file is NVRAM. Status registers A-D are modelled as bitfields.

use bitfield_struct::bitfield;
use open_enum::open_enum;

/// Architecturally defined CMOS register indices.
#[open_enum]
#[derive(Debug, Clone, Copy, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CmosReg {
    SECONDS = 0x00,
    SECONDS_ALARM = 0x01,
    MINUTES = 0x02,
    MINUTES_ALARM = 0x03,
    HOURS = 0x04,
    HOURS_ALARM = 0x05,
    DAY_OF_WEEK = 0x06,
    DAY_OF_MONTH = 0x07,
    MONTH = 0x08,
    YEAR = 0x09,
    STATUS_A = 0x0A,
    STATUS_B = 0x0B,
    STATUS_C = 0x0C,
    STATUS_D = 0x0D,
}

impl CmosReg {
    /// Returns whether this index holds part of the current time or date.
    pub const fn is_time(self) -> bool {
        matches!(self.0, 0x00 | 0x02 | 0x04 | 0x06 | 0x07 | 0x08 | 0x09)
    }

    /// Returns whether this index is one of the three alarm registers.
    pub const fn is_alarm(self) -> bool {
        matches!(self.0, 0x01 | 0x03 | 0x05)
    }
}

/// Register A: rate select, divider control, update in progress.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct StatusRegA {
    #[bits(4)]
    pub rate: u8,
    #[bits(3)]
    pub divider: u8,
    /// Update in progress; read-only.
    pub uip: bool,
}

impl StatusRegA {
    /// Returns whether the divider chain lets the oscillator drive the clock.
    pub const fn oscillator_running(&self) -> bool {
        self.divider() <= DIVIDER_NORMAL
    }

    /// Returns whether the divider chain is held in reset (`0b110` or `0b111`).
    pub const fn divider_in_reset(&self) -> bool {
        self.divider() & DIVIDER_RESET == DIVIDER_RESET
    }
}

/// Register B: mode and interrupt enable bits.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct StatusRegB {
    /// Daylight saving enable; stored but not acted on.
    pub dse: bool,
    pub hour_24: bool,
    /// Data mode: binary when set, BCD when clear.
    pub binary: bool,
    pub sqwe: bool,
    pub uie: bool,
    pub aie: bool,
    pub pie: bool,
    pub set: bool,
}

/// Register C: interrupt flags. Read-only and cleared on read.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct StatusRegC {
    #[bits(4)]
    _reserved: u8,
    pub uf: bool,
    pub af: bool,
    pub pf: bool,
    pub irqf: bool,
}

impl StatusRegC {
    /// Returns whether any flag is pending whose enable bit is set in `b`.
    pub const fn enabled_pending(&self, b: StatusRegB) -> bool {
        (self.uf() && b.uie()) || (self.af() && b.aie()) || (self.pf() && b.pie())
    }
}

/// Register D: valid RAM and time.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct StatusRegD {
    #[bits(7)]
    _reserved: u8,
    pub vrt: bool,
}

/// Divider setting of a running 32.768 kHz time base.
pub const DIVIDER_NORMAL: u8 = 0b010;

/// Divider bits that hold the chain in reset when both are set.
pub const DIVIDER_RESET: u8 = 0b110;

/// Register A value after power-on: 32.768 kHz divider, 1024 Hz rate.
pub const REG_A_POWER_ON: u8 = 0x26;

/// Register B value after power-on: 24-hour BCD, all interrupts disabled.
pub const REG_B_POWER_ON: u8 = 0x02;

/// Register D always reads back valid RAM and time.
pub const REG_D_VALUE: u8 = StatusRegD::new().with_vrt(true).into_bits();

/// Alarm register values at or above this are "don't care".
pub const ALARM_WILDCARD_MIN: u8 = 0xC0;

/// Periodic interrupt period per rate-select code, in 1/32768 s ticks (0 = disabled).
///
/// Codes 1 and 2 alias codes 8 and 9 on a 32.768 kHz time base.
pub const PERIODIC_RATE_TICKS: [u32; 16] = [
    0, 128, 256, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384,
];
