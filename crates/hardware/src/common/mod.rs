//! Common types and constants shared by the device model.
//!
//! This module provides:
//! 1. **Constants:** Time base scaling, update-cycle timing, and port layout.
//! 2. **Error Handling:** Configuration and snapshot error types.

/// Device-wide constants.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{CMOS_SIZE, NANOS_PER_SEC, RTC_CLOCK_HZ};
pub use error::{ConfigError, SnapshotError};
