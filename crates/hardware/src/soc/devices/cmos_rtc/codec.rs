//! Conversion between calendar time and guest register encodings.
//!
//! This module translates between `time::PrimitiveDateTime` and the byte values held in the
//! time registers. It provides:
//! 1. **Field codec:** BCD or binary per field, with the 12-hour PM flag in bit 7 of hours.
//! 2. **Register set codec:** Whole time register sets, including the year offset from the
//!    configured base year and the optional century register.
//! 3. **Reinterpretation:** Decoding never fails; out-of-range fields are clamped into the
//!    nearest valid value and reported to the caller.

use time::{Date, Month, PrimitiveDateTime, Time};

use super::regs::StatusRegB;

/// PM flag in the hours register in 12-hour mode.
pub const HOUR_PM: u8 = 0x80;

/// Data format selected by register B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecMode {
    /// Binary when `true`, BCD when `false`.
    pub binary: bool,
    /// 24-hour when `true`, 12-hour with PM flag when `false`.
    pub hour_24: bool,
}

impl CodecMode {
    /// BCD, 24-hour (the power-on mode).
    pub const BCD_24H: Self = Self {
        binary: false,
        hour_24: true,
    };

    /// Extracts the data mode from register B.
    pub const fn from_reg_b(b: StatusRegB) -> Self {
        Self {
            binary: b.binary(),
            hour_24: b.hour_24(),
        }
    }
}

/// Packs a value below 100 as two BCD digits.
pub const fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

/// Unpacks two BCD digits arithmetically; invalid nibbles pass through as `hi * 10 + lo`.
pub const fn from_bcd(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0F)
}

/// Encodes a plain field (seconds, minutes, day, month, year).
pub const fn encode_field(v: u8, mode: CodecMode) -> u8 {
    if mode.binary { v } else { to_bcd(v) }
}

/// Decodes a plain field.
pub const fn decode_field(raw: u8, mode: CodecMode) -> u8 {
    if mode.binary { raw } else { from_bcd(raw) }
}

/// Encodes an hour in `0..24`.
///
/// In 12-hour mode midnight is `12` AM and noon is `12 | PM`.
pub const fn encode_hour(hour: u8, mode: CodecMode) -> u8 {
    if mode.hour_24 {
        return encode_field(hour, mode);
    }
    let h12 = if hour % 12 == 0 { 12 } else { hour % 12 };
    let pm = if hour >= 12 { HOUR_PM } else { 0 };
    encode_field(h12, mode) | pm
}

/// Decodes an hours register into `0..24` (not range-checked).
pub const fn decode_hour(raw: u8, mode: CodecMode) -> u8 {
    let hour = decode_field(raw & !HOUR_PM, mode);
    if mode.hour_24 {
        hour
    } else {
        let base = hour % 12;
        if raw & HOUR_PM != 0 { base + 12 } else { base }
    }
}

/// Raw contents of the time and date registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRegisters {
    /// Seconds register.
    pub seconds: u8,
    /// Minutes register.
    pub minutes: u8,
    /// Hours register, including the PM flag in 12-hour mode.
    pub hours: u8,
    /// Day of week, 1 = Sunday.
    pub day_of_week: u8,
    /// Day of month.
    pub day_of_month: u8,
    /// Month.
    pub month: u8,
    /// Year within the century, or offset from the base year.
    pub year: u8,
    /// Century register, when one is wired.
    pub century: Option<u8>,
}

/// Year interpretation of the year register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearScheme {
    /// Year register is `(year - base) mod 100`; decoded as `base + value`.
    BaseOffset(i32),
    /// Year register is `year mod 100` and a century register holds `year / 100`.
    Century,
}

/// Result of decoding a register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTime {
    /// Calendar instant named by the registers, after clamping.
    pub datetime: PrimitiveDateTime,
    /// `true` if any field had to be clamped into range.
    pub clamped: bool,
}

/// Encodes `dt` into register form.
pub fn encode(dt: PrimitiveDateTime, mode: CodecMode, scheme: YearScheme) -> TimeRegisters {
    let year = dt.year();
    let (year_reg, century) = match scheme {
        YearScheme::BaseOffset(base) => ((year - base).rem_euclid(100) as u8, None),
        YearScheme::Century => (
            year.rem_euclid(100) as u8,
            Some(encode_field(year.div_euclid(100).clamp(0, 99) as u8, mode)),
        ),
    };
    TimeRegisters {
        seconds: encode_field(dt.second(), mode),
        minutes: encode_field(dt.minute(), mode),
        hours: encode_hour(dt.hour(), mode),
        day_of_week: encode_field(dt.weekday().number_from_sunday(), mode),
        day_of_month: encode_field(dt.day(), mode),
        month: encode_field(u8::from(dt.month()), mode),
        year: encode_field(year_reg, mode),
        century,
    }
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if time::util::is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Decodes a register set; day of week is ignored and recomputed from the date.
pub fn decode(regs: &TimeRegisters, mode: CodecMode, scheme: YearScheme) -> DecodedTime {
    let yy = i32::from(decode_field(regs.year, mode));
    let raw_year = match (scheme, regs.century) {
        (YearScheme::Century, Some(century)) => i32::from(decode_field(century, mode)) * 100 + yy,
        (YearScheme::Century, None) => 2000 + yy,
        (YearScheme::BaseOffset(base), _) => base + yy,
    };

    let raw_month = decode_field(regs.month, mode);
    let raw_hour = decode_hour(regs.hours, mode);
    let raw_minute = decode_field(regs.minutes, mode);
    let raw_second = decode_field(regs.seconds, mode);
    let raw_day = decode_field(regs.day_of_month, mode);

    let year = raw_year.clamp(1, 9999);
    let month = raw_month.clamp(1, 12);
    let day = raw_day.clamp(1, days_in_month(year, month));
    let hour = raw_hour.min(23);
    let minute = raw_minute.min(59);
    let second = raw_second.min(59);

    let clamped = year != raw_year
        || month != raw_month
        || day != raw_day
        || hour != raw_hour
        || minute != raw_minute
        || second != raw_second;

    let date = Month::try_from(month)
        .and_then(|m| Date::from_calendar_date(year, m, day))
        .unwrap_or(Date::MIN);
    let time = Time::from_hms(hour, minute, second).unwrap_or(Time::MIDNIGHT);

    DecodedTime {
        datetime: PrimitiveDateTime::new(date, time),
        clamped,
    }
}
