//! Alarm matcher.

use super::codec::{CodecMode, decode_field, decode_hour};
use super::regs::ALARM_WILDCARD_MIN;

/// Raw alarm register contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmRegisters {
    /// Seconds alarm.
    pub seconds: u8,
    /// Minutes alarm.
    pub minutes: u8,
    /// Hours alarm.
    pub hours: u8,
}

/// Returns whether an alarm register value matches any time.
pub const fn is_wildcard(raw: u8) -> bool {
    raw >= ALARM_WILDCARD_MIN
}

impl AlarmRegisters {
    /// Returns whether the alarm fires at `hour:minute:second`.
    pub fn matches(&self, mode: CodecMode, hour: u8, minute: u8, second: u8) -> bool {
        let field = |raw: u8, now: u8| is_wildcard(raw) || decode_field(raw, mode) == now;
        field(self.seconds, second)
            && field(self.minutes, minute)
            && (is_wildcard(self.hours) || decode_hour(self.hours, mode) == hour)
    }
}
