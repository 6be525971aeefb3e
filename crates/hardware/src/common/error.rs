//! Error definitions.
//!
//! The device itself never reports errors to the guest: a physical RTC accepts every
//! write. Errors exist only at the host-facing boundaries:
//! 1. **Configuration:** Reading, parsing, and validating `RtcConfig`.
//! 2. **Snapshots:** Restoring a saved register image.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file `{}`", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for `RtcConfig`.
    #[error("malformed config")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the device cannot operate with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}

/// Errors raised while restoring a device snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The saved register image does not cover the full CMOS file.
    #[error("register image has {0} bytes, expected 256")]
    ImageSize(usize),
}
