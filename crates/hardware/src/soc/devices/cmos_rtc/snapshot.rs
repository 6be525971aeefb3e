//! Save/restore image of the device.
//!
//! A snapshot holds what the guest can observe: the register file, the index latch, the
//! guest time, and the undelivered periodic backlog. Host-side deadlines are not saved;
//! they are recomputed relative to the restoring host's clock.

use serde::{Deserialize, Serialize};

use crate::common::constants::CMOS_SIZE;
use crate::common::error::SnapshotError;

/// Serializable device state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcSnapshot {
    /// Currently selected register index.
    pub index: u8,
    /// NMI mask bit last written to the index port.
    pub nmi_masked: bool,
    /// Full register file.
    pub cmos: Vec<u8>,
    /// Guest time, whole Unix seconds.
    pub guest_secs: i64,
    /// Guest time, nanoseconds into the current second.
    pub guest_subsec_ns: u32,
    /// Periodic ticks awaiting reinjection.
    pub coalesced: u32,
}

impl RtcSnapshot {
    /// Returns the register image as a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::ImageSize`] if the image is not exactly 256 bytes.
    pub fn cmos_image(&self) -> Result<[u8; CMOS_SIZE], SnapshotError> {
        <[u8; CMOS_SIZE]>::try_from(self.cmos.as_slice())
            .map_err(|_| SnapshotError::ImageSize(self.cmos.len()))
    }
}
