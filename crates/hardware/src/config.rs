//! Configuration for the CMOS RTC device.
//!
//! This module defines the static configuration of one device instance. It provides:
//! 1. **Defaults:** PC-standard port, IRQ, base year, and host-policy tuning constants.
//! 2. **Structures:** `RtcConfig`, deserialized from JSON with per-field defaults.
//! 3. **Enums:** Lost-tick policy and suspend behavior.
//!
//! Every field is optional in JSON; use `RtcConfig::default()` for a standard PC RTC.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants;
use crate::common::error::ConfigError;

/// Default configuration constants for the device.
mod defaults {
    use crate::common::constants;

    /// Year that a year register value of zero stands for.
    pub const BASE_YEAR: i32 = 2000;

    /// Standard ISA base port (index at 0x70, data at 0x71).
    pub const IO_BASE: u16 = constants::DEFAULT_IO_BASE;

    /// ISA IRQ driven by the RTC.
    pub const IRQ: u32 = constants::DEFAULT_IRQ;

    /// Maximum number of periodic ticks held back for reinjection.
    pub const MAX_COALESCED: u32 = 256;

    /// Update cycles replayed per real second while slewing.
    pub const SLEW_CATCHUP_FACTOR: u32 = 4;

    /// Longest backlog (in seconds) replayed by the slew policy; older seconds are dropped.
    pub const MAX_SLEW_BACKLOG_SECS: u64 = 300;
}

/// Strategy for reconciling the update cycle with host time after a scheduling delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum LostTickPolicy {
    /// Jump straight to host-observed now; missed seconds are not replayed.
    #[default]
    Discard,
    /// Replay missed seconds at an accelerated rate until caught up.
    Slew,
}

/// How guest time behaves while the host is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum SuspendMode {
    /// Guest time keeps pace with the host wall clock across suspend.
    #[default]
    Running,
    /// Guest time stands still for the duration of the suspend.
    Frozen,
}

/// Static configuration of one RTC instance.
///
/// # Examples
///
/// ```
/// use rtcsim_core::config::{LostTickPolicy, RtcConfig};
///
/// let json = r#"{ "base_year": 1980, "lost_tick_policy": "Slew" }"#;
/// let config = RtcConfig::from_json_str(json).unwrap();
/// assert_eq!(config.base_year, 1980);
/// assert_eq!(config.lost_tick_policy, LostTickPolicy::Slew);
/// assert_eq!(config.io_base, 0x70);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RtcConfig {
    /// Year represented by a year register value of zero.
    #[serde(default = "RtcConfig::default_base_year")]
    pub base_year: i32,

    /// First I/O port decoded by the device.
    #[serde(default = "RtcConfig::default_io_base")]
    pub io_base: u16,

    /// Interrupt line number reported to the bus.
    #[serde(default = "RtcConfig::default_irq")]
    pub irq: u32,

    /// CMOS index wired as the century register (0x32 on ACPI PCs), if any.
    #[serde(default)]
    pub century_register: Option<u8>,

    /// Recovery strategy for delayed update cycles.
    #[serde(default)]
    pub lost_tick_policy: LostTickPolicy,

    /// Cap on the periodic reinjection backlog.
    #[serde(default = "RtcConfig::default_max_coalesced")]
    pub max_coalesced: u32,

    /// Replay rate (update cycles per real second) of the slew policy.
    #[serde(default = "RtcConfig::default_slew_catchup_factor")]
    pub slew_catchup_factor: u32,

    /// Largest backlog of seconds the slew policy will replay.
    #[serde(default = "RtcConfig::default_max_slew_backlog_secs")]
    pub max_slew_backlog_secs: u64,

    /// Guest time behavior across host suspend.
    #[serde(default)]
    pub suspend_mode: SuspendMode,

    /// Initial guest time as Unix seconds; the host wall clock when absent.
    #[serde(default)]
    pub start_time: Option<i64>,

    /// Offset added to host UTC to form guest time (for guests keeping local time).
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl RtcConfig {
    /// Returns the default base year.
    fn default_base_year() -> i32 {
        defaults::BASE_YEAR
    }

    /// Returns the default I/O base port.
    fn default_io_base() -> u16 {
        defaults::IO_BASE
    }

    /// Returns the default IRQ line.
    fn default_irq() -> u32 {
        defaults::IRQ
    }

    /// Returns the default coalescing cap.
    fn default_max_coalesced() -> u32 {
        defaults::MAX_COALESCED
    }

    /// Returns the default slew replay rate.
    fn default_slew_catchup_factor() -> u32 {
        defaults::SLEW_CATCHUP_FACTOR
    }

    /// Returns the default slew backlog bound.
    fn default_max_slew_backlog_secs() -> u64 {
        defaults::MAX_SLEW_BACKLOG_SECS
    }

    /// Returns the default configuration with a different base year.
    pub fn with_base_year(base_year: i32) -> Self {
        Self {
            base_year,
            ..Self::default()
        }
    }

    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and [`ConfigError::Invalid`] when a
    /// field fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`RtcConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that every field holds a value the device can run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=9999).contains(&self.base_year) {
            return Err(ConfigError::Invalid {
                field: "base_year",
                reason: format!("{} is outside 1..=9999", self.base_year),
            });
        }
        if self.io_base.checked_add(constants::RTC_PORT_COUNT - 1).is_none() {
            return Err(ConfigError::Invalid {
                field: "io_base",
                reason: format!("{:#06x} leaves no room for four ports", self.io_base),
            });
        }
        if let Some(reg) = self.century_register {
            if reg <= 0x0D {
                return Err(ConfigError::Invalid {
                    field: "century_register",
                    reason: format!("{reg:#04x} overlaps the clock registers"),
                });
            }
        }
        if self.lost_tick_policy == LostTickPolicy::Slew && self.slew_catchup_factor < 2 {
            return Err(ConfigError::Invalid {
                field: "slew_catchup_factor",
                reason: "slewing needs at least two updates per second".to_string(),
            });
        }
        if self.utc_offset_secs.unsigned_abs() > 24 * 3600 {
            return Err(ConfigError::Invalid {
                field: "utc_offset_secs",
                reason: format!("{} exceeds one day", self.utc_offset_secs),
            });
        }
        Ok(())
    }
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            base_year: defaults::BASE_YEAR,
            io_base: defaults::IO_BASE,
            irq: defaults::IRQ,
            century_register: None,
            lost_tick_policy: LostTickPolicy::default(),
            max_coalesced: defaults::MAX_COALESCED,
            slew_catchup_factor: defaults::SLEW_CATCHUP_FACTOR,
            max_slew_backlog_secs: defaults::MAX_SLEW_BACKLOG_SECS,
            suspend_mode: SuspendMode::default(),
            start_time: None,
            utc_offset_secs: 0,
        }
    }
}
