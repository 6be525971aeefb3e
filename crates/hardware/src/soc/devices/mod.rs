//! Port-Mapped IO Devices.
//!
//! This module contains the device implementations that can be attached to an
//! [`IoBus`](crate::soc::interconnect::IoBus).

/// MC146818 CMOS real-time clock and NVRAM.
pub mod cmos_rtc;

pub use cmos_rtc::CmosRtc;

pub use crate::soc::traits::Device;
